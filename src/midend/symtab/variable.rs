use std::fmt::Display;

use serde::Serialize;

use crate::midend::types::Type;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Hash)]
pub struct Variable {
    pub name: String,
    type_: Type,
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_, self.name)
    }
}

impl Variable {
    pub fn new(name: String, type_: Type) -> Self {
        Variable { name, type_ }
    }

    pub fn type_(&self) -> Type {
        self.type_
    }
}
