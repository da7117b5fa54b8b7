//! Flattening of the grammar's recursive list rules.

use crate::frontend::{node::SyntaxNode, production::Production};

impl SyntaxNode {
    /// On a `start` node: every `procedure` node in source order, followed by the `main` node.
    pub fn procedure_definitions(&self) -> Vec<&SyntaxNode> {
        let mut definitions = Vec::new();
        if self.production() != Some(Production::Start) {
            return definitions;
        }

        let mut procedures = self.child(1);
        loop {
            match procedures.production() {
                Some(Production::ProceduresCons) => {
                    definitions.push(procedures.child(0));
                    procedures = procedures.child(1);
                }
                Some(Production::ProceduresMain) => {
                    definitions.push(procedures.child(0));
                    break;
                }
                _ => break,
            }
        }

        definitions
    }

    /// On a `params` node: the `dcl` of every parameter, in positional order.
    pub fn parameter_list(&self) -> Vec<&SyntaxNode> {
        let mut parameters = Vec::new();
        if self.production() != Some(Production::ParamsList) {
            return parameters;
        }

        let mut paramlist = self.child(0);
        loop {
            parameters.push(paramlist.child(0));
            match paramlist.production() {
                Some(Production::ParamlistCons) => paramlist = paramlist.child(2),
                _ => break,
            }
        }

        parameters
    }

    /// On a `dcls` node: each non-empty `dcls` node, in source order. The declaration is
    /// `child(1)` and its initializer terminal `child(3)`.
    pub fn declaration_list(&self) -> Vec<&SyntaxNode> {
        let mut declarations = Vec::new();
        let mut dcls = self;
        while matches!(
            dcls.production(),
            Some(Production::DclsNum) | Some(Production::DclsNull)
        ) {
            declarations.push(dcls);
            dcls = dcls.child(0);
        }

        declarations.reverse();
        declarations
    }

    /// On a `statements` node: each `statement`, in source order.
    pub fn statement_list(&self) -> Vec<&SyntaxNode> {
        let mut statements = Vec::new();
        let mut list = self;
        while list.production() == Some(Production::StatementsCons) {
            statements.push(list.child(1));
            list = list.child(0);
        }

        statements.reverse();
        statements
    }

    /// On an `arglist` node: each argument `expr`, left to right.
    pub fn argument_list(&self) -> Vec<&SyntaxNode> {
        let mut arguments = Vec::new();
        let mut arglist = self;
        loop {
            match arglist.production() {
                Some(Production::ArglistCons) => {
                    arguments.push(arglist.child(0));
                    arglist = arglist.child(2);
                }
                Some(Production::ArglistSingle) => {
                    arguments.push(arglist.child(0));
                    break;
                }
                _ => break,
            }
        }

        arguments
    }
}
