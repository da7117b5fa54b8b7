use crate::{
    frontend::SyntaxNode,
    midend::symtab::{
        DefinedSymbol, Procedure, SemanticError, UndefinedSymbol, ENTRY_PROCEDURE_NAME,
    },
    trace,
};

/// Every procedure of the program, filled before any body is checked so that calls may refer
/// to procedures defined later in the source.
#[derive(Debug, Default)]
pub struct ProcedureRegistry<'tree> {
    procedures: Vec<Procedure<'tree>>,
    entry: Option<Procedure<'tree>>,
}

impl<'tree> ProcedureRegistry<'tree> {
    pub fn new() -> Self {
        Self {
            procedures: Vec::new(),
            entry: None,
        }
    }

    /// Registers the procedures of a `start` tree: ordinary procedures in source order, then
    /// the entry procedure.
    pub fn from_program(program: &'tree SyntaxNode) -> Result<Self, SemanticError> {
        let mut registry = Self::new();
        for definition in program.procedure_definitions() {
            registry.insert(Procedure::from_definition(definition)?)?;
        }

        if registry.entry.is_none() {
            return Err(UndefinedSymbol::MissingEntry.into());
        }

        Ok(registry)
    }

    pub fn insert(&mut self, procedure: Procedure<'tree>) -> Result<(), SemanticError> {
        let already_defined = self
            .iter()
            .any(|existing| existing.name() == procedure.name());
        if already_defined {
            return Err(DefinedSymbol::procedure(procedure.name()).into());
        }

        trace::debug!("register procedure {}", procedure);
        if procedure.is_entry() {
            self.entry = Some(procedure);
        } else {
            self.procedures.push(procedure);
        }
        Ok(())
    }

    /// Resolves a call target. The entry procedure is never a valid target.
    pub fn lookup_callable(&self, name: &str) -> Result<&Procedure<'tree>, UndefinedSymbol> {
        if name == ENTRY_PROCEDURE_NAME {
            return Err(UndefinedSymbol::entry_procedure(name));
        }

        self.procedures
            .iter()
            .find(|procedure| procedure.name() == name)
            .ok_or_else(|| UndefinedSymbol::procedure(name))
    }

    pub fn entry(&self) -> Result<&Procedure<'tree>, UndefinedSymbol> {
        self.entry.as_ref().ok_or(UndefinedSymbol::MissingEntry)
    }

    /// Ordinary procedures in source order.
    pub fn ordinary(&self) -> impl Iterator<Item = &Procedure<'tree>> {
        self.procedures.iter()
    }

    /// Ordinary procedures in source order, then the entry procedure.
    pub fn iter(&self) -> impl Iterator<Item = &Procedure<'tree>> {
        self.procedures.iter().chain(self.entry.iter())
    }

    pub fn len(&self) -> usize {
        self.procedures.len() + usize::from(self.entry.is_some())
    }
}
