use std::fmt::Display;

use name_derive::{ReflectName, VariantReflectable};
use serde::Serialize;

use crate::frontend::{production::Production, symbols::Terminal};

/// A terminal together with the source text the scanner matched for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub terminal: Terminal,
    pub lexeme: String,
}

impl Token {
    pub fn new(terminal: Terminal, lexeme: &str) -> Self {
        Self {
            terminal,
            lexeme: lexeme.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Terminal(Token),
    Rule(Production),
}

/// One node of the reconstructed parse tree.
///
/// A terminal node has no children and carries its lexeme. A rule node owns exactly one child
/// per body symbol of its production, and the head of each child matches the body symbol at
/// the same position (checked by the builder), so positional access with [`SyntaxNode::child`]
/// never goes out of bounds for a node whose production has been matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ReflectName)]
pub struct SyntaxNode {
    kind: NodeKind,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn terminal(token: Token) -> Self {
        Self {
            kind: NodeKind::Terminal(token),
            children: Vec::new(),
        }
    }

    /// Callers must supply children matching `production`'s body; the builder validates this
    /// before calling.
    pub fn rule(production: Production, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: NodeKind::Rule(production),
            children,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The grammar symbol this node reduces to.
    pub fn head(&self) -> &'static str {
        match &self.kind {
            NodeKind::Terminal(token) => token.terminal.name(),
            NodeKind::Rule(production) => production.head(),
        }
    }

    pub fn body(&self) -> Vec<&'static str> {
        match &self.kind {
            NodeKind::Terminal(_) => Vec::new(),
            NodeKind::Rule(production) => production.body().collect(),
        }
    }

    /// Terminal text; empty for rule nodes.
    pub fn lexeme(&self) -> &str {
        match &self.kind {
            NodeKind::Terminal(token) => token.lexeme.as_str(),
            NodeKind::Rule(_) => "",
        }
    }

    pub fn production(&self) -> Option<Production> {
        match &self.kind {
            NodeKind::Terminal(_) => None,
            NodeKind::Rule(production) => Some(*production),
        }
    }

    /// Variant name of the production, or the terminal name; used to label tracing spans.
    pub fn production_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Terminal(token) => token.terminal.name(),
            NodeKind::Rule(production) => production.variant_name(),
        }
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> &SyntaxNode {
        &self.children[index]
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    fn write_derivation(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Terminal(token) => writeln!(f, "{} {}", token.terminal, token.lexeme)?,
            NodeKind::Rule(production) => writeln!(f, "{}", production.rule())?,
        }
        for child in &self.children {
            child.write_derivation(f)?;
        }
        Ok(())
    }
}

/// List rules nest one level per element, so long statement lists are freed with a worklist
/// instead of the default recursive drop.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Prints the subtree as a root-to-leaf derivation, one record per line; this is the same
/// format the upstream parser produces.
impl Display for SyntaxNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_derivation(f)
    }
}
