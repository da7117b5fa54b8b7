use serde::Serialize;

use crate::{
    backend::{arch::Mips32, generate_program, CodegenError, Instruction},
    frontend::{build_trees, parse_trace, Production, StructuralError, SyntaxNode, TraceOrder},
    midend::{
        frame::FrameLayout,
        symtab::{ProcedureKind, ProcedureRegistry, SemanticError},
        typecheck::TypeChecker,
    },
    trace,
};


/// Everything that can stop a compilation. Exactly one is reported per run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// One procedure's entry in the `--emit symbols` dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureSymbols {
    pub name: String,
    pub kind: ProcedureKind,
    pub signature: String,
    pub frame: FrameLayout,
}

/// A whole program, reconstructed from its trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    root: SyntaxNode,
}

impl Program {
    /// Parses a trace and builds its tree, which must be a single `start` node.
    pub fn from_trace(text: &str, order: TraceOrder) -> Result<Self, CompileError> {
        let records = parse_trace(text)?;
        trace::debug!("parsed {} records", records.len());

        let mut roots = build_trees(records, order)?;
        match roots.as_slice() {
            [root] if root.production() == Some(Production::Start) => {}
            _ => {
                let found = roots.iter().map(|root| root.head().to_string()).collect();
                return Err(StructuralError::unexpected_roots(found).into());
            }
        }

        let root = roots.remove(0);
        trace::debug!("program tree has {} nodes", root.size());
        Ok(Self { root })
    }

    pub fn tree(&self) -> &SyntaxNode {
        &self.root
    }

    /// Registers every procedure, then checks each one: ordinary procedures in source order,
    /// the entry procedure last.
    pub fn analyze(&self) -> Result<ProcedureRegistry<'_>, CompileError> {
        let _span = trace::span_auto!(trace::Level::INFO, "Semantic analysis");

        let registry = ProcedureRegistry::from_program(&self.root)?;
        for procedure in registry.iter() {
            TypeChecker::new(procedure, &registry).check()?;
        }

        trace::info!("{} procedure(s) checked", registry.len());
        Ok(registry)
    }

    /// Procedures with their frame layouts, in the order they are generated.
    pub fn symbols(&self) -> Result<Vec<ProcedureSymbols>, CompileError> {
        let registry = self.analyze()?;
        let entry = registry.entry().map_err(SemanticError::from)?;

        Ok(std::iter::once(entry)
            .chain(registry.ordinary())
            .map(|procedure| ProcedureSymbols {
                name: procedure.name().into(),
                kind: procedure.kind(),
                signature: procedure.to_string(),
                frame: FrameLayout::for_procedure::<Mips32>(procedure),
            })
            .collect())
    }

    /// Checks the whole program, then generates it. Nothing is generated unless every
    /// procedure checks.
    pub fn compile(&self) -> Result<Vec<Instruction>, CompileError> {
        let registry = self.analyze()?;
        Ok(generate_program::<Mips32>(&registry)?)
    }

    /// The generated program as assembly text, one line per instruction.
    pub fn assembly(&self) -> Result<String, CompileError> {
        let mut text = String::new();
        for instruction in self.compile()? {
            text.push_str(&instruction.to_string());
            text.push('\n');
        }
        Ok(text)
    }
}

/// Trace text in, assembly text out.
pub fn compile_trace(text: &str, order: TraceOrder) -> Result<String, CompileError> {
    Program::from_trace(text, order)?.assembly()
}
