use std::fmt::Display;

use serde::Serialize;

use crate::frontend::{Production, SyntaxNode};

/// The language has exactly two types.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Hash)]
pub enum Type {
    Int,
    IntPointer,
}

impl Type {
    /// Type named by a `type` node: `int*` exactly when the clause carries the pointer marker.
    pub fn of_type_clause(type_clause: &SyntaxNode) -> Self {
        match type_clause.production() {
            Some(Production::TypeIntStar) => Self::IntPointer,
            _ => Self::Int,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::IntPointer)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::IntPointer => write!(f, "int*"),
        }
    }
}
