pub use errors::*;
pub use procedure::*;
pub use registry::ProcedureRegistry;
pub use variable::Variable;

mod errors;
mod procedure;
mod registry;
mod variable;
