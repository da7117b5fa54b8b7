pub mod builder;
pub mod errors;
mod lists;
pub mod node;
pub mod production;
pub mod record;
#[cfg(test)]
pub mod source;
pub mod symbols;


pub use builder::{build_trees, TraceOrder};
pub use errors::StructuralError;
pub use node::SyntaxNode;
pub use production::{AdditiveOperator, Comparison, MultiplicativeOperator, Production};
pub use record::parse_trace;
