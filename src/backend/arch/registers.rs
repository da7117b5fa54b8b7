use std::fmt::Display;

use serde::Serialize;

/// A general register of the target. The constants name the fixed roles of the calling
/// convention; nothing else is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Register(u8);

impl Register {
    pub const COUNT: u8 = 32;

    pub const ZERO: Register = Register(0);
    /// First entry parameter; argument of every runtime routine.
    pub const ARGUMENT: Register = Register(1);
    /// Second entry parameter.
    pub const SECOND_ARGUMENT: Register = Register(2);
    /// Result of every expression, procedure and runtime routine.
    pub const ACCUMULATOR: Register = Register(3);
    /// Holds the word size for the whole run.
    pub const WORD_SIZE: Register = Register(4);
    pub const SCRATCH: Register = Register(5);
    pub const SCRATCH_LOW: Register = Register(6);
    pub const SCRATCH_HIGH: Register = Register(7);
    /// Address of the runtime routine about to be called.
    pub const ROUTINE_ADDRESS: Register = Register(10);
    /// Holds the null sentinel for the whole run.
    pub const NULL_SENTINEL: Register = Register(11);
    /// Return address parked across `println`.
    pub const SAVED_RETURN: Register = Register(18);
    pub const FRAME_POINTER: Register = Register(29);
    pub const STACK_POINTER: Register = Register(30);
    pub const RETURN_ADDRESS: Register = Register(31);

    pub fn index(&self) -> usize {
        usize::from(self.0)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}
