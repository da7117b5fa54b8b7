pub mod frame;
pub mod symtab;
pub mod typecheck;
pub mod types;
