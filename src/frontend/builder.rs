use crate::{
    frontend::{
        errors::StructuralError,
        node::SyntaxNode,
        production::Production,
        record::{RecordKind, ReductionRecord},
    },
    trace,
};

/// Order in which the records of a trace were captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOrder {
    /// Root-to-leaf pre-order, as written by the upstream parser. Fed to the builder reversed,
    /// which mirrors every node's children.
    #[default]
    Derivation,
    /// Bottom-up, in the order a shift-reduce parser finishes each node.
    Reduction,
}

/// Stack machine that assembles syntax trees from reduction records.
pub struct TreeBuilder {
    stack: Vec<SyntaxNode>,
    order: TraceOrder,
}

impl TreeBuilder {
    pub fn new(order: TraceOrder) -> Self {
        Self {
            stack: Vec::new(),
            order,
        }
    }

    /// Number of completed nodes that have not yet been claimed by a parent.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consumes one record: pops as many nodes as the record's body has symbols, installs them
    /// as its children and pushes the new node.
    pub fn push(&mut self, record: ReductionRecord) -> Result<(), StructuralError> {
        let line = record.line;
        let node = match record.kind {
            RecordKind::Terminal(token) => SyntaxNode::terminal(token),
            RecordKind::Reduction(production) => {
                let children = self.pop_children(line, production)?;
                SyntaxNode::rule(production, children)
            }
        };

        trace::trace!("line {}: push {} (depth {})", line, node.production_name(), self.depth());
        self.stack.push(node);
        Ok(())
    }

    fn pop_children(
        &mut self,
        line: usize,
        production: Production,
    ) -> Result<Vec<SyntaxNode>, StructuralError> {
        let needed = production.body_len();
        let available = self.stack.len();
        if needed > available {
            return Err(StructuralError::StackUnderflow {
                line,
                rule: production.rule().into(),
                needed,
                available,
            });
        }

        let mut children = self.stack.split_off(available - needed);
        if self.order == TraceOrder::Derivation {
            children.reverse();
        }

        for (position, (child, expected)) in children.iter().zip(production.body()).enumerate() {
            if child.head() != expected {
                return Err(StructuralError::ChildMismatch {
                    line,
                    rule: production.rule().into(),
                    position,
                    expected: expected.into(),
                    found: child.head().into(),
                });
            }
        }

        Ok(children)
    }

    /// Every node left on the stack is a root, bottom of the stack first.
    pub fn finish(self) -> Vec<SyntaxNode> {
        self.stack
    }
}

/// Builds the trees for a whole trace, reversing derivation-order input first.
pub fn build_trees(
    mut records: Vec<ReductionRecord>,
    order: TraceOrder,
) -> Result<Vec<SyntaxNode>, StructuralError> {
    let _span = trace::span_auto!(trace::Level::DEBUG, "Build syntax trees");

    if order == TraceOrder::Derivation {
        records.reverse();
    }

    let mut builder = TreeBuilder::new(order);
    for record in records {
        builder.push(record)?;
    }

    let roots = builder.finish();
    trace::debug!("built {} root(s)", roots.len());
    Ok(roots)
}
