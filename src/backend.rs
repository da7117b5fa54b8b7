pub mod arch;
pub mod codegen;
pub mod instruction;

#[cfg(test)]
pub mod simulator;

pub use codegen::{generate_program, CodegenError};
pub use instruction::Instruction;
