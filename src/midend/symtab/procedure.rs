use std::fmt::Display;

use serde::Serialize;

use crate::{
    frontend::{Production, SyntaxNode},
    hashmap_ooo_iter::{HashMapOOOIter, InsertionOrderedMap},
    midend::{
        symtab::{DefinedSymbol, Mismatch, SemanticError, UndefinedSymbol, Variable},
        types::Type,
    },
    trace,
};

/// Reserved name of the procedure program execution starts in.
pub const ENTRY_PROCEDURE_NAME: &str = "wain";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProcedureKind {
    /// `wain`: two parameters arriving in registers, its own prologue and epilogue.
    Entry,
    Ordinary,
}

/// A procedure's signature, its locals and the subtrees of its body.
///
/// Locals are everything declared in the procedure, parameters included, in declaration
/// order: parameters first, then the declaration list.
#[derive(Debug, Clone)]
pub struct Procedure<'tree> {
    name: String,
    kind: ProcedureKind,
    parameters: Vec<Variable>,
    locals: InsertionOrderedMap<String, Variable>,
    definition: &'tree SyntaxNode,
}

impl Display for Procedure<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self
            .parameters
            .iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "int {}({})", self.name, arguments)
    }
}

impl<'tree> Procedure<'tree> {
    /// Builds the signature and local table of a `procedure` or `main` node.
    ///
    /// Rejects redefinition of any name within the procedure, and a non-`int` second parameter
    /// of the entry procedure.
    pub fn from_definition(definition: &'tree SyntaxNode) -> Result<Self, SemanticError> {
        let kind = match definition.production() {
            Some(Production::Main) => ProcedureKind::Entry,
            _ => ProcedureKind::Ordinary,
        };

        let mut procedure = Self {
            name: definition.child(1).lexeme().into(),
            kind,
            parameters: Vec::new(),
            locals: InsertionOrderedMap::new(),
            definition,
        };

        trace::trace!("collect declarations of procedure {}", procedure.name);

        match kind {
            ProcedureKind::Entry => {
                procedure.declare(definition.child(3), true)?;
                procedure.declare(definition.child(5), true)?;
                let second = procedure.parameters[1].type_();
                if second != Type::Int {
                    return Err(Mismatch::EntryParameter { found: second }.into());
                }
            }
            ProcedureKind::Ordinary => {
                for dcl in definition.child(3).parameter_list() {
                    procedure.declare(dcl, true)?;
                }
            }
        }

        for declaration in procedure.declarations().declaration_list() {
            procedure.declare(declaration.child(1), false)?;
        }

        Ok(procedure)
    }

    fn declare(&mut self, dcl: &SyntaxNode, parameter: bool) -> Result<(), SemanticError> {
        let name = dcl.child(1).lexeme();
        let variable = Variable::new(name.into(), Type::of_type_clause(dcl.child(0)));

        if self.locals.insert(name.into(), variable.clone()).is_err() {
            return Err(DefinedSymbol::variable(&self.name, name).into());
        }

        if parameter {
            self.parameters.push(variable);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    pub fn is_entry(&self) -> bool {
        self.kind == ProcedureKind::Entry
    }

    pub fn parameters(&self) -> &[Variable] {
        &self.parameters
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|parameter| parameter.name == name)
    }

    /// All locals, parameters first, in declaration order.
    pub fn locals(&self) -> HashMapOOOIter<'_, String, Variable> {
        self.locals.iter()
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub fn lookup_variable(&self, name: &str) -> Result<&Variable, UndefinedSymbol> {
        self.locals
            .get(&name.to_string())
            .ok_or_else(|| UndefinedSymbol::variable(&self.name, name))
    }

    pub fn definition(&self) -> &'tree SyntaxNode {
        self.definition
    }

    /// The `dcls` subtree.
    pub fn declarations(&self) -> &'tree SyntaxNode {
        match self.kind {
            ProcedureKind::Entry => self.definition.child(8),
            ProcedureKind::Ordinary => self.definition.child(6),
        }
    }

    /// The `statements` subtree.
    pub fn statements(&self) -> &'tree SyntaxNode {
        match self.kind {
            ProcedureKind::Entry => self.definition.child(9),
            ProcedureKind::Ordinary => self.definition.child(7),
        }
    }

    /// The `expr` after `return`.
    pub fn return_expression(&self) -> &'tree SyntaxNode {
        match self.kind {
            ProcedureKind::Entry => self.definition.child(11),
            ProcedureKind::Ordinary => self.definition.child(9),
        }
    }
}
