//! A small interpreter for generated code, with native stand-ins for the runtime routines.
//! Only the test suites use it.

use std::collections::HashMap;

use crate::backend::{
    arch::Register,
    codegen::RUNTIME_IMPORTS,
    instruction::{BranchTarget, Instruction, WordValue},
};

const STACK_TOP: i32 = 0x0100_0000;
const HEAP_BASE: i32 = 0x0010_0000;
const ARRAY_BASE: i32 = 0x0008_0000;
const ROUTINE_BASE: i32 = 0x7fff_0000;
/// Returning here ends the run.
const EXIT_ADDRESS: i32 = 0x7fff_fff0;
const STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("unknown label {0}")]
    UnknownLabel(String),

    #[error("unaligned access at {0:#x}")]
    UnalignedAccess(i32),

    #[error("read of uninitialized memory at {0:#x}")]
    UninitializedRead(i32),

    #[error("jump to {0:#x}, outside the program")]
    BadJump(i32),

    #[error("data word executed at index {0}")]
    ExecutedData(usize),

    #[error("division by zero at index {0}")]
    DivisionByZero(usize),

    #[error("no exit after {0} steps")]
    StepLimit(usize),
}

/// What a finished run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// `$3` when the entry procedure returned.
    pub result: i32,
    /// Every value passed to `print`, in order.
    pub printed: Vec<i32>,
    /// `(address, words)` of every successful `new`.
    pub allocations: Vec<(i32, i32)>,
    /// Every address passed to `delete`.
    pub releases: Vec<i32>,
    /// `$1` and `$2` as `init` saw them.
    pub init_arguments: Option<(i32, i32)>,
    pub stack_pointer: i32,
}

pub struct Machine {
    registers: [i32; Register::COUNT as usize],
    hi: i32,
    lo: i32,
    memory: HashMap<i32, i32>,
    words: Vec<Instruction>,
    labels: HashMap<String, usize>,
    pc: usize,
    heap_next: i32,
    outcome: Outcome,
}

impl Machine {
    /// Loads a listing; labels resolve to the index of the next machine word.
    pub fn load(code: &[Instruction]) -> Self {
        let mut words = Vec::new();
        let mut labels = HashMap::new();
        for instruction in code {
            match instruction {
                Instruction::Label(name) => {
                    labels.insert(name.clone(), words.len());
                }
                other if other.is_machine_word() => words.push(other.clone()),
                _ => {}
            }
        }

        let mut registers = [0; Register::COUNT as usize];
        registers[Register::STACK_POINTER.index()] = STACK_TOP;
        registers[Register::RETURN_ADDRESS.index()] = EXIT_ADDRESS;

        Self {
            registers,
            hi: 0,
            lo: 0,
            memory: HashMap::new(),
            words,
            labels,
            pc: 0,
            heap_next: HEAP_BASE,
            outcome: Outcome {
                result: 0,
                printed: Vec::new(),
                allocations: Vec::new(),
                releases: Vec::new(),
                init_arguments: None,
                stack_pointer: STACK_TOP,
            },
        }
    }

    /// Runs the entry procedure with two plain integers in `$1` and `$2`.
    pub fn run(mut self, first: i32, second: i32) -> Result<Outcome, SimulationError> {
        self.set(Register::ARGUMENT, first);
        self.set(Register::SECOND_ARGUMENT, second);
        self.execute()
    }

    /// Runs the entry procedure with an array: its base in `$1`, its length in `$2`.
    pub fn run_with_array(mut self, array: &[i32]) -> Result<Outcome, SimulationError> {
        for (index, value) in array.iter().enumerate() {
            self.memory.insert(ARRAY_BASE + 4 * index as i32, *value);
        }
        self.set(Register::ARGUMENT, ARRAY_BASE);
        self.set(Register::SECOND_ARGUMENT, array.len() as i32);
        self.execute()
    }

    fn get(&self, register: Register) -> i32 {
        self.registers[register.index()]
    }

    fn set(&mut self, register: Register, value: i32) {
        if register != Register::ZERO {
            self.registers[register.index()] = value;
        }
    }

    fn load_word(&self, address: i32) -> Result<i32, SimulationError> {
        if address % 4 != 0 {
            return Err(SimulationError::UnalignedAccess(address));
        }
        self.memory
            .get(&address)
            .copied()
            .ok_or(SimulationError::UninitializedRead(address))
    }

    fn store_word(&mut self, address: i32, value: i32) -> Result<(), SimulationError> {
        if address % 4 != 0 {
            return Err(SimulationError::UnalignedAccess(address));
        }
        self.memory.insert(address, value);
        Ok(())
    }

    fn resolve(&self, value: &WordValue) -> Result<i32, SimulationError> {
        match value {
            // words are 32 bits; unsigned literals wrap into the signed range
            WordValue::Literal(literal) => Ok(*literal as i32),
            WordValue::Label(label) => {
                if let Some(position) = RUNTIME_IMPORTS.iter().position(|routine| routine == label) {
                    return Ok(ROUTINE_BASE + 4 * position as i32);
                }
                self.labels
                    .get(label)
                    .map(|index| 4 * *index as i32)
                    .ok_or_else(|| SimulationError::UnknownLabel(label.clone()))
            }
        }
    }

    fn jump(&mut self, address: i32) -> Result<(), SimulationError> {
        if address % 4 != 0 || address < 0 || (address / 4) as usize >= self.words.len() {
            return Err(SimulationError::BadJump(address));
        }
        self.pc = (address / 4) as usize;
        Ok(())
    }

    fn branch(&mut self, target: &BranchTarget) -> Result<(), SimulationError> {
        match target {
            BranchTarget::Label(label) => {
                self.pc = *self
                    .labels
                    .get(label)
                    .ok_or_else(|| SimulationError::UnknownLabel(label.clone()))?;
            }
            BranchTarget::Offset(offset) => {
                // `pc` already points past the branch
                self.pc = (self.pc as i64 + i64::from(*offset)) as usize;
            }
        }
        Ok(())
    }

    fn call_routine(&mut self, routine: i32) {
        let argument = self.get(Register::ARGUMENT);
        // same order as the import list: print, new, delete, init
        match (routine - ROUTINE_BASE) / 4 {
            0 => self.outcome.printed.push(argument),
            1 => {
                if argument < 1 {
                    self.set(Register::ACCUMULATOR, 0);
                } else {
                    let address = self.heap_next;
                    for index in 0..argument {
                        self.memory.insert(address + 4 * index, 0);
                    }
                    self.heap_next += 4 * argument;
                    self.outcome.allocations.push((address, argument));
                    self.set(Register::ACCUMULATOR, address);
                }
            }
            2 => self.outcome.releases.push(argument),
            _ => {
                self.outcome.init_arguments =
                    Some((argument, self.get(Register::SECOND_ARGUMENT)));
            }
        }
    }

    fn execute(mut self) -> Result<Outcome, SimulationError> {
        for _ in 0..STEP_LIMIT {
            let index = self.pc;
            let instruction = self
                .words
                .get(index)
                .cloned()
                .ok_or(SimulationError::BadJump(4 * index as i32))?;
            self.pc += 1;

            match instruction {
                Instruction::Add(r) => {
                    let value = self.get(r.source).wrapping_add(self.get(r.operand));
                    self.set(r.destination, value);
                }
                Instruction::Sub(r) => {
                    let value = self.get(r.source).wrapping_sub(self.get(r.operand));
                    self.set(r.destination, value);
                }
                Instruction::Slt(r) => {
                    let value = self.get(r.source) < self.get(r.operand);
                    self.set(r.destination, value.into());
                }
                Instruction::Sltu(r) => {
                    let value = (self.get(r.source) as u32) < (self.get(r.operand) as u32);
                    self.set(r.destination, value.into());
                }
                Instruction::Mult(r) => {
                    let product = i64::from(self.get(r.a)) * i64::from(self.get(r.b));
                    self.lo = product as i32;
                    self.hi = (product >> 32) as i32;
                }
                Instruction::Div(r) => {
                    let (dividend, divisor) = (self.get(r.a), self.get(r.b));
                    if divisor == 0 {
                        return Err(SimulationError::DivisionByZero(index));
                    }
                    self.lo = dividend.wrapping_div(divisor);
                    self.hi = dividend.wrapping_rem(divisor);
                }
                Instruction::Divu(r) => {
                    let (dividend, divisor) = (self.get(r.a) as u32, self.get(r.b) as u32);
                    if divisor == 0 {
                        return Err(SimulationError::DivisionByZero(index));
                    }
                    self.lo = (dividend / divisor) as i32;
                    self.hi = (dividend % divisor) as i32;
                }
                Instruction::Mfhi(register) => self.set(register, self.hi),
                Instruction::Mflo(register) => self.set(register, self.lo),
                Instruction::Lis(register) => {
                    let value = match self.words.get(self.pc) {
                        Some(Instruction::Word(value)) => self.resolve(value)?,
                        _ => return Err(SimulationError::ExecutedData(self.pc)),
                    };
                    self.set(register, value);
                    self.pc += 1;
                }
                Instruction::Word(_) => return Err(SimulationError::ExecutedData(index)),
                Instruction::Lw(m) => {
                    let value = self.load_word(self.get(m.base).wrapping_add(m.offset))?;
                    self.set(m.value, value);
                }
                Instruction::Sw(m) => {
                    let address = self.get(m.base).wrapping_add(m.offset);
                    self.store_word(address, self.get(m.value))?;
                }
                Instruction::Beq(b) => {
                    if self.get(b.a) == self.get(b.b) {
                        self.branch(&b.target)?;
                    }
                }
                Instruction::Bne(b) => {
                    if self.get(b.a) != self.get(b.b) {
                        self.branch(&b.target)?;
                    }
                }
                Instruction::Jr(register) => {
                    let target = self.get(register);
                    if target == EXIT_ADDRESS {
                        self.outcome.result = self.get(Register::ACCUMULATOR);
                        self.outcome.stack_pointer = self.get(Register::STACK_POINTER);
                        return Ok(self.outcome);
                    }
                    self.jump(target)?;
                }
                Instruction::Jalr(register) => {
                    let target = self.get(register);
                    self.set(Register::RETURN_ADDRESS, 4 * self.pc as i32);
                    if (ROUTINE_BASE..ROUTINE_BASE + 16).contains(&target) {
                        self.call_routine(target);
                    } else {
                        self.jump(target)?;
                    }
                }
                Instruction::Label(_) | Instruction::Comment(_) | Instruction::Import(_) => {}
            }
        }

        Err(SimulationError::StepLimit(STEP_LIMIT))
    }

    pub fn stack_top() -> i32 {
        STACK_TOP
    }

    pub fn array_base() -> i32 {
        ARRAY_BASE
    }
}

/// Loads and runs a listing with two integer arguments.
pub fn run(code: &[Instruction], first: i32, second: i32) -> Result<Outcome, SimulationError> {
    Machine::load(code).run(first, second)
}

pub fn run_with_array(code: &[Instruction], array: &[i32]) -> Result<Outcome, SimulationError> {
    Machine::load(code).run_with_array(array)
}
