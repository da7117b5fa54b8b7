use name_derive::NameReflectable;

use crate::{
    backend::{
        arch::{Register, TargetArchitecture},
        codegen::{
            CodegenError, ProcedureGenerator, ALLOCATE_ROUTINE, DEALLOCATE_ROUTINE, PRINT_ROUTINE,
        },
        instruction::{BranchTarget, Instruction},
    },
    frontend::{Production, SyntaxNode},
};

impl<Target> ProcedureGenerator<'_, '_, Target>
where
    Target: TargetArchitecture,
{
    pub(super) fn lower_statements(&mut self, statements: &SyntaxNode) -> Result<(), CodegenError> {
        for statement in statements.statement_list() {
            self.lower_statement(statement)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, statement), level = "trace", fields(tree_name = SyntaxNode::reflect_name(), production = statement.production_name()))]
    fn lower_statement(&mut self, statement: &SyntaxNode) -> Result<(), CodegenError> {
        let production = statement
            .production()
            .ok_or_else(|| CodegenError::unexpected_node("statement", statement.head()))?;
        self.comment(production.rule());

        match production {
            Production::Assign => self.lower_assignment(statement.child(0), statement.child(2)),
            Production::If => {
                let labels = self.counters.next_if();

                self.lower_test(statement.child(2))?;
                self.emit(Instruction::beq(
                    Register::ACCUMULATOR,
                    Register::ZERO,
                    BranchTarget::Label(labels.else_label.clone()),
                ));
                self.lower_statements(statement.child(5))?;
                self.emit(Instruction::beq(
                    Register::ZERO,
                    Register::ZERO,
                    BranchTarget::Label(labels.end_label.clone()),
                ));
                self.emit(Instruction::label(&labels.else_label));
                self.lower_statements(statement.child(9))?;
                self.emit(Instruction::label(&labels.end_label));
                Ok(())
            }
            Production::While => {
                let labels = self.counters.next_while();

                self.emit(Instruction::label(&labels.start_label));
                self.lower_test(statement.child(2))?;
                self.emit(Instruction::beq(
                    Register::ACCUMULATOR,
                    Register::ZERO,
                    BranchTarget::Label(labels.end_label.clone()),
                ));
                self.lower_statements(statement.child(5))?;
                self.emit(Instruction::beq(
                    Register::ZERO,
                    Register::ZERO,
                    BranchTarget::Label(labels.start_label.clone()),
                ));
                self.emit(Instruction::label(&labels.end_label));
                Ok(())
            }
            Production::Println => {
                self.lower_expr(statement.child(2))?;
                self.emit(Instruction::add(
                    Register::ARGUMENT,
                    Register::ACCUMULATOR,
                    Register::ZERO,
                ));
                self.emit(Instruction::add(
                    Register::SAVED_RETURN,
                    Register::RETURN_ADDRESS,
                    Register::ZERO,
                ));
                self.call_routine(PRINT_ROUTINE);
                self.emit(Instruction::add(
                    Register::RETURN_ADDRESS,
                    Register::SAVED_RETURN,
                    Register::ZERO,
                ));
                Ok(())
            }
            Production::Delete => {
                self.lower_expr(statement.child(3))?;
                self.emit(Instruction::add(
                    Register::ARGUMENT,
                    Register::ACCUMULATOR,
                    Register::ZERO,
                ));
                self.push(Register::RETURN_ADDRESS);
                // skip the three-word routine call when the pointer is null
                self.emit(Instruction::beq(
                    Register::ARGUMENT,
                    Register::NULL_SENTINEL,
                    BranchTarget::Offset(3),
                ));
                self.call_routine(DEALLOCATE_ROUTINE);
                self.pop(Register::RETURN_ADDRESS);
                Ok(())
            }
            _ => Err(CodegenError::unexpected_node(
                "statement",
                statement.production_name(),
            )),
        }
    }

    fn lower_assignment(&mut self, lvalue: &SyntaxNode, value: &SyntaxNode) -> Result<(), CodegenError> {
        match lvalue.production() {
            Some(Production::LvalueId) => {
                let offset = self.offset_of(lvalue.child(0).lexeme())?;
                self.lower_expr(value)?;
                self.emit(Instruction::sw(
                    Register::ACCUMULATOR,
                    offset,
                    Register::FRAME_POINTER,
                ));
                Ok(())
            }
            Some(Production::LvalueDeref) => {
                self.lower_expr(value)?;
                self.push(Register::ACCUMULATOR);
                self.lower_factor(lvalue.child(1))?;
                self.pop(Register::SCRATCH);
                self.emit(Instruction::sw(Register::SCRATCH, 0, Register::ACCUMULATOR));
                Ok(())
            }
            Some(Production::LvalueParen) => self.lower_assignment(lvalue.child(1), value),
            _ => Err(CodegenError::unexpected_node(
                "lvalue",
                lvalue.production_name(),
            )),
        }
    }

    /// `new int[n]`: `$3` ends up holding the block, or the null sentinel when the runtime
    /// returned zero.
    pub(super) fn lower_allocation(&mut self, length: &SyntaxNode) -> Result<(), CodegenError> {
        self.lower_expr(length)?;
        self.emit(Instruction::add(
            Register::ARGUMENT,
            Register::ACCUMULATOR,
            Register::ZERO,
        ));
        self.push(Register::RETURN_ADDRESS);
        self.call_routine(ALLOCATE_ROUTINE);
        self.pop(Register::RETURN_ADDRESS);
        self.emit(Instruction::bne(
            Register::ZERO,
            Register::ACCUMULATOR,
            BranchTarget::Offset(1),
        ));
        self.emit(Instruction::add(
            Register::ACCUMULATOR,
            Register::ZERO,
            Register::NULL_SENTINEL,
        ));
        Ok(())
    }
}
