use std::fmt::Display;

use serde::Serialize;

use crate::backend::arch::Register;

/// Operand of a `.word` directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum WordValue {
    /// Kept as written so unsigned literals above `i32::MAX` print unchanged.
    Literal(i64),
    Label(String),
}

impl Display for WordValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{}", value),
            Self::Label(label) => write!(f, "{}", label),
        }
    }
}

/// Where a conditional branch goes: a label, or a signed count of instructions to skip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BranchTarget {
    Label(String),
    Offset(i32),
}

impl Display for BranchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{}", label),
            Self::Offset(offset) => write!(f, "{}", offset),
        }
    }
}

/// Three-register form: `destination = source op operand`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThreeRegisters {
    pub destination: Register,
    pub source: Register,
    pub operand: Register,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TwoRegisters {
    pub a: Register,
    pub b: Register,
}

/// `value` is loaded from or stored to `offset(base)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryOperands {
    pub value: Register,
    pub offset: i32,
    pub base: Register,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BranchOperands {
    pub a: Register,
    pub b: Register,
    pub target: BranchTarget,
}

/// One line of emitted assembly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Instruction {
    Add(ThreeRegisters),
    Sub(ThreeRegisters),
    Slt(ThreeRegisters),
    Sltu(ThreeRegisters),
    Mult(TwoRegisters),
    Div(TwoRegisters),
    Divu(TwoRegisters),
    Mfhi(Register),
    Mflo(Register),
    /// Loads the following `.word` into the register and skips over it.
    Lis(Register),
    Word(WordValue),
    Lw(MemoryOperands),
    Sw(MemoryOperands),
    Beq(BranchOperands),
    Bne(BranchOperands),
    Jr(Register),
    Jalr(Register),
    Label(String),
    Comment(String),
    Import(String),
}

impl Instruction {
    pub fn add(destination: Register, source: Register, operand: Register) -> Self {
        Self::Add(ThreeRegisters {
            destination,
            source,
            operand,
        })
    }

    pub fn sub(destination: Register, source: Register, operand: Register) -> Self {
        Self::Sub(ThreeRegisters {
            destination,
            source,
            operand,
        })
    }

    pub fn slt(destination: Register, source: Register, operand: Register) -> Self {
        Self::Slt(ThreeRegisters {
            destination,
            source,
            operand,
        })
    }

    pub fn sltu(destination: Register, source: Register, operand: Register) -> Self {
        Self::Sltu(ThreeRegisters {
            destination,
            source,
            operand,
        })
    }

    pub fn mult(a: Register, b: Register) -> Self {
        Self::Mult(TwoRegisters { a, b })
    }

    pub fn div(a: Register, b: Register) -> Self {
        Self::Div(TwoRegisters { a, b })
    }

    pub fn divu(a: Register, b: Register) -> Self {
        Self::Divu(TwoRegisters { a, b })
    }

    pub fn lw(value: Register, offset: i32, base: Register) -> Self {
        Self::Lw(MemoryOperands {
            value,
            offset,
            base,
        })
    }

    pub fn sw(value: Register, offset: i32, base: Register) -> Self {
        Self::Sw(MemoryOperands {
            value,
            offset,
            base,
        })
    }

    pub fn beq(a: Register, b: Register, target: BranchTarget) -> Self {
        Self::Beq(BranchOperands { a, b, target })
    }

    pub fn bne(a: Register, b: Register, target: BranchTarget) -> Self {
        Self::Bne(BranchOperands { a, b, target })
    }

    pub fn label(name: &str) -> Self {
        Self::Label(name.into())
    }

    pub fn comment(text: &str) -> Self {
        Self::Comment(text.into())
    }

    /// Whether this line occupies a word of the assembled program.
    pub fn is_machine_word(&self) -> bool {
        !matches!(
            self,
            Self::Label(_) | Self::Comment(_) | Self::Import(_)
        )
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add(operands) => write!(
                f,
                "add {}, {}, {}",
                operands.destination, operands.source, operands.operand
            ),
            Self::Sub(operands) => write!(
                f,
                "sub {}, {}, {}",
                operands.destination, operands.source, operands.operand
            ),
            Self::Slt(operands) => write!(
                f,
                "slt {}, {}, {}",
                operands.destination, operands.source, operands.operand
            ),
            Self::Sltu(operands) => write!(
                f,
                "sltu {}, {}, {}",
                operands.destination, operands.source, operands.operand
            ),
            Self::Mult(operands) => write!(f, "mult {}, {}", operands.a, operands.b),
            Self::Div(operands) => write!(f, "div {}, {}", operands.a, operands.b),
            Self::Divu(operands) => write!(f, "divu {}, {}", operands.a, operands.b),
            Self::Mfhi(register) => write!(f, "mfhi {}", register),
            Self::Mflo(register) => write!(f, "mflo {}", register),
            Self::Lis(register) => write!(f, "lis {}", register),
            Self::Word(value) => write!(f, ".word {}", value),
            Self::Lw(operands) => write!(
                f,
                "lw {}, {}({})",
                operands.value, operands.offset, operands.base
            ),
            Self::Sw(operands) => write!(
                f,
                "sw {}, {}({})",
                operands.value, operands.offset, operands.base
            ),
            Self::Beq(operands) => {
                write!(f, "beq {}, {}, {}", operands.a, operands.b, operands.target)
            }
            Self::Bne(operands) => {
                write!(f, "bne {}, {}, {}", operands.a, operands.b, operands.target)
            }
            Self::Jr(register) => write!(f, "jr {}", register),
            Self::Jalr(register) => write!(f, "jalr {}", register),
            Self::Label(name) => write!(f, "{}:", name),
            Self::Comment(text) => write!(f, ";; {}", text),
            Self::Import(name) => write!(f, ".import {}", name),
        }
    }
}
