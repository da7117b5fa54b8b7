/// Failures while turning a reduction trace into syntax trees.
///
/// `line` is always the 1-based line of the offending record in the input text, regardless of
/// the order in which records are fed to the builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("line {line}: unknown grammar symbol '{symbol}'")]
    UnknownSymbol { line: usize, symbol: String },

    #[error("line {line}: '{rule}' is not a rule of the grammar")]
    UnknownProduction { line: usize, rule: String },

    #[error("line {line}: terminal record '{record}' must carry exactly one lexeme")]
    MalformedTerminal { line: usize, record: String },

    #[error("line {line}: '{lexeme}' does not fit in a machine word")]
    InvalidNumber { line: usize, lexeme: String },

    #[error("line {line}: '{rule}' needs {needed} completed nodes but only {available} are built")]
    StackUnderflow {
        line: usize,
        rule: String,
        needed: usize,
        available: usize,
    },

    #[error("line {line}: '{rule}' expects {expected} at position {position}, found {found}")]
    ChildMismatch {
        line: usize,
        rule: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("expected a single 'start' tree, found [{}]", .found.join(", "))]
    UnexpectedRoots { found: Vec<String> },
}

impl StructuralError {
    pub fn unknown_symbol(line: usize, symbol: &str) -> Self {
        Self::UnknownSymbol {
            line,
            symbol: symbol.into(),
        }
    }

    pub fn unknown_production(line: usize, symbols: &[&str]) -> Self {
        Self::UnknownProduction {
            line,
            rule: symbols.join(" "),
        }
    }

    pub fn malformed_terminal(line: usize, record: &str) -> Self {
        Self::MalformedTerminal {
            line,
            record: record.trim().into(),
        }
    }

    pub fn invalid_number(line: usize, lexeme: &str) -> Self {
        Self::InvalidNumber {
            line,
            lexeme: lexeme.into(),
        }
    }

    pub fn unexpected_roots(found: Vec<String>) -> Self {
        Self::UnexpectedRoots { found }
    }
}
