pub mod registers;

pub use registers::Register;

pub trait TargetArchitecture {
    /// Size of the machine word in bytes; every value of the language occupies one word.
    fn word_size() -> i32;

    /// Machine value standing for a null pointer.
    fn null_sentinel() -> i32;
}

/// The 32-bit, word-addressed MIPS-like target.
pub struct Mips32;

impl TargetArchitecture for Mips32 {
    fn word_size() -> i32 {
        4
    }

    fn null_sentinel() -> i32 {
        1
    }
}
