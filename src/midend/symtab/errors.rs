use crate::{
    frontend::{Comparison, MultiplicativeOperator},
    midend::types::Type,
};

/// Every way a program can be rejected after its tree was built. The first one found aborts
/// the compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("{0}")]
    DuplicateDefinition(#[from] DefinedSymbol),

    #[error("{0}")]
    UndefinedName(#[from] UndefinedSymbol),

    #[error("{0}")]
    ArityOrTypeMismatch(#[from] Mismatch),

    #[error("{0}")]
    OperatorTypeError(#[from] OperatorMisuse),

    #[error("return expression of procedure {procedure} has type {found}, expected int")]
    ReturnTypeError { procedure: String, found: Type },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinedSymbol {
    #[error("procedure {0} is already defined")]
    Procedure(String),

    #[error("{name} is already defined in procedure {procedure}")]
    Variable { procedure: String, name: String },
}

impl DefinedSymbol {
    pub fn procedure(name: &str) -> Self {
        Self::Procedure(name.into())
    }

    pub fn variable(procedure: &str, name: &str) -> Self {
        Self::Variable {
            procedure: procedure.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UndefinedSymbol {
    #[error("variable {name} is not defined in procedure {procedure}")]
    Variable { procedure: String, name: String },

    #[error("procedure {0} is undefined")]
    Procedure(String),

    #[error("the entry procedure {0} cannot be called")]
    EntryProcedure(String),

    #[error("the program has no entry procedure")]
    MissingEntry,
}

impl UndefinedSymbol {
    pub fn variable(procedure: &str, name: &str) -> Self {
        Self::Variable {
            procedure: procedure.into(),
            name: name.into(),
        }
    }

    pub fn procedure(name: &str) -> Self {
        Self::Procedure(name.into())
    }

    pub fn entry_procedure(name: &str) -> Self {
        Self::EntryProcedure(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("wrong number of arguments for procedure {procedure}: expected {expected}, found {found}")]
    CallArity {
        procedure: String,
        expected: usize,
        found: usize,
    },

    #[error("wrong type of argument {position} for procedure {procedure}: expected {expected}, found {found}")]
    CallArgument {
        procedure: String,
        position: usize,
        expected: Type,
        found: Type,
    },

    #[error("cannot assign a value of type {value} to an lvalue of type {lvalue}")]
    Assignment { lvalue: Type, value: Type },

    #[error("declaration of {name} as {declared} has an initializer of the wrong type")]
    Initializer { name: String, declared: Type },

    #[error("the second parameter of the entry procedure must be int, found {found}")]
    EntryParameter { found: Type },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperatorMisuse {
    #[error("dereference of non-pointer (operand is {0})")]
    Dereference(Type),

    #[error("reference on a non int (operand is {0})")]
    AddressOf(Type),

    #[error("invalid operands for +: {0} and {1}")]
    Addition(Type, Type),

    #[error("invalid operands for -: {0} and {1}")]
    Subtraction(Type, Type),

    #[error("invalid operands for {0}: {1} and {2}")]
    Multiplicative(MultiplicativeOperator, Type, Type),

    #[error("cannot compare {1} with {2} using {0}")]
    Comparison(Comparison, Type, Type),

    #[error("array length must be int, found {0}")]
    Allocation(Type),

    #[error("println expects int, found {0}")]
    Print(Type),

    #[error("delete[] expects int*, found {0}")]
    Delete(Type),
}
