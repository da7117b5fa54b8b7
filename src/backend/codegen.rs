use std::marker::PhantomData;

use crate::{
    backend::{
        arch::{Register, TargetArchitecture},
        instruction::{Instruction, WordValue},
    },
    midend::{
        frame::FrameLayout,
        symtab::{Procedure, ProcedureRegistry, SemanticError, UndefinedSymbol},
        typecheck::TypeChecker,
    },
    trace,
};

mod expressions;
mod procedures;
mod statements;


/// Runtime routines every program imports, in declaration order.
pub const RUNTIME_IMPORTS: [&str; 4] = ["print", "new", "delete", "init"];

pub const PRINT_ROUTINE: &str = "print";
pub const ALLOCATE_ROUTINE: &str = "new";
pub const DEALLOCATE_ROUTINE: &str = "delete";
pub const INITIALIZE_ROUTINE: &str = "init";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("{0}")]
    Type(#[from] SemanticError),

    #[error("no frame slot for {name} in procedure {procedure}")]
    MissingSlot { procedure: String, name: String },

    #[error("cannot lower {found} as {expected}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },

    #[error("numeric literal {0} does not fit in a word")]
    InvalidLiteral(String),
}

impl CodegenError {
    pub fn unexpected_node(expected: &'static str, found: &'static str) -> Self {
        Self::UnexpectedNode { expected, found }
    }
}

/// Program-wide counters for control-flow labels. One instance is threaded through the
/// generation of every procedure so that labels never repeat across procedures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounters {
    if_count: usize,
    while_count: usize,
}

/// Labels of one lowered `if`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfLabels {
    pub else_label: String,
    pub end_label: String,
}

/// Labels of one lowered `while`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileLabels {
    pub start_label: String,
    pub end_label: String,
}

impl LabelCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_if(&mut self) -> IfLabels {
        self.if_count += 1;
        IfLabels {
            else_label: format!("se{}", self.if_count),
            end_label: format!("ee{}", self.if_count),
        }
    }

    pub fn next_while(&mut self) -> WhileLabels {
        self.while_count += 1;
        WhileLabels {
            start_label: format!("sw{}", self.while_count),
            end_label: format!("ew{}", self.while_count),
        }
    }

    pub fn ifs_generated(&self) -> usize {
        self.if_count
    }

    pub fn whiles_generated(&self) -> usize {
        self.while_count
    }
}

/// Label of an ordinary procedure's first instruction.
pub fn procedure_label(name: &str) -> String {
    format!("F{}", name)
}

/// Lowers a single, already checked procedure.
///
/// The accumulator holds the value of the expression just lowered; binary operators spill
/// their left operand to the stack while the right one is evaluated.
pub struct ProcedureGenerator<'a, 'tree, Target>
where
    Target: TargetArchitecture,
{
    checker: TypeChecker<'a, 'tree>,
    layout: &'a FrameLayout,
    counters: &'a mut LabelCounters,
    code: Vec<Instruction>,
    _target: PhantomData<Target>,
}

impl<'a, 'tree, Target> ProcedureGenerator<'a, 'tree, Target>
where
    Target: TargetArchitecture,
{
    pub fn new(
        procedure: &'a Procedure<'tree>,
        registry: &'a ProcedureRegistry<'tree>,
        layout: &'a FrameLayout,
        counters: &'a mut LabelCounters,
    ) -> Self {
        Self {
            checker: TypeChecker::new(procedure, registry),
            layout,
            counters,
            code: Vec::new(),
            _target: PhantomData,
        }
    }

    fn procedure(&self) -> &'a Procedure<'tree> {
        self.checker.procedure()
    }

    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    fn comment(&mut self, text: &str) {
        self.emit(Instruction::comment(text));
    }

    /// The two-instruction constant idiom.
    fn load_constant(&mut self, register: Register, value: WordValue) {
        self.emit(Instruction::Lis(register));
        self.emit(Instruction::Word(value));
    }

    fn push(&mut self, register: Register) {
        self.emit(Instruction::sw(
            register,
            -Target::word_size(),
            Register::STACK_POINTER,
        ));
        self.emit(Instruction::sub(
            Register::STACK_POINTER,
            Register::STACK_POINTER,
            Register::WORD_SIZE,
        ));
    }

    fn pop(&mut self, register: Register) {
        self.emit(Instruction::add(
            Register::STACK_POINTER,
            Register::STACK_POINTER,
            Register::WORD_SIZE,
        ));
        self.emit(Instruction::lw(
            register,
            -Target::word_size(),
            Register::STACK_POINTER,
        ));
    }

    /// Loads a runtime routine's address and links to it; the routine's argument is already
    /// in `$1`.
    fn call_routine(&mut self, routine: &str) {
        self.load_constant(Register::ROUTINE_ADDRESS, WordValue::Label(routine.into()));
        self.emit(Instruction::Jalr(Register::ROUTINE_ADDRESS));
    }

    fn offset_of(&self, name: &str) -> Result<i32, CodegenError> {
        self.layout
            .offset_of(name)
            .ok_or_else(|| CodegenError::MissingSlot {
                procedure: self.procedure().name().into(),
                name: name.into(),
            })
    }

    /// Lowers the whole procedure, prologue to epilogue.
    pub fn generate(mut self) -> Result<Vec<Instruction>, CodegenError> {
        let _span = trace::span_auto!(
            trace::Level::DEBUG,
            "Generate procedure",
            name = self.procedure().name()
        );

        if self.procedure().is_entry() {
            self.generate_entry()?;
        } else {
            self.generate_ordinary()?;
        }

        trace::debug!(
            "generated {} lines for procedure {}",
            self.code.len(),
            self.procedure().name()
        );
        Ok(self.code)
    }
}

/// Lowers every procedure of a checked program: the imports, the entry procedure (execution
/// starts at its first instruction), then the ordinary procedures in source order.
pub fn generate_program<Target>(
    registry: &ProcedureRegistry,
) -> Result<Vec<Instruction>, CodegenError>
where
    Target: TargetArchitecture,
{
    let _span = trace::span_auto!(trace::Level::INFO, "Code generation");

    let mut code: Vec<Instruction> = RUNTIME_IMPORTS
        .iter()
        .map(|routine| Instruction::Import((*routine).into()))
        .collect();

    let mut counters = LabelCounters::new();
    let entry = registry.entry()?;
    let procedures = std::iter::once(entry).chain(registry.ordinary());
    for procedure in procedures {
        let layout = FrameLayout::for_procedure::<Target>(procedure);
        let generator =
            ProcedureGenerator::<Target>::new(procedure, registry, &layout, &mut counters);
        code.extend(generator.generate()?);
    }

    trace::info!(
        "generated {} line(s), {} if and {} while label pair(s)",
        code.len(),
        counters.ifs_generated(),
        counters.whiles_generated()
    );
    Ok(code)
}

impl From<UndefinedSymbol> for CodegenError {
    fn from(undefined: UndefinedSymbol) -> Self {
        Self::Type(undefined.into())
    }
}
