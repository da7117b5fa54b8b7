use crate::{
    backend::{
        arch::{Register, TargetArchitecture},
        codegen::{procedure_label, CodegenError, ProcedureGenerator},
        instruction::{Instruction, WordValue},
    },
    frontend::{AdditiveOperator, Comparison, MultiplicativeOperator, Production, SyntaxNode},
    midend::types::Type,
};

impl<Target> ProcedureGenerator<'_, '_, Target>
where
    Target: TargetArchitecture,
{
    /// Lowers `left`, spills it, lowers `right`, and leaves `left` in `$5` and `right` in `$3`.
    fn lower_operands(
        &mut self,
        left: impl FnOnce(&mut Self) -> Result<(), CodegenError>,
        right: impl FnOnce(&mut Self) -> Result<(), CodegenError>,
    ) -> Result<(), CodegenError> {
        left(self)?;
        self.push(Register::ACCUMULATOR);
        right(self)?;
        self.pop(Register::SCRATCH);
        Ok(())
    }

    #[tracing::instrument(skip(self, expr), level = "trace", fields(production = expr.production_name()))]
    pub(super) fn lower_expr(&mut self, expr: &SyntaxNode) -> Result<(), CodegenError> {
        match expr.production() {
            Some(Production::ExprTerm) => self.lower_term(expr.child(0)),
            Some(Production::ExprBinary(operator)) => {
                let left_type = self.checker.type_of_expr(expr.child(0))?;
                let right_type = self.checker.type_of_term(expr.child(2))?;
                self.lower_operands(
                    |generator| generator.lower_expr(expr.child(0)),
                    |generator| generator.lower_term(expr.child(2)),
                )?;
                self.combine_additive(operator, left_type, right_type);
                Ok(())
            }
            _ => Err(CodegenError::unexpected_node("expr", expr.production_name())),
        }
    }

    /// Pointer arithmetic scales the integer operand by the word size; subtracting two
    /// pointers divides the byte distance back down to elements.
    fn combine_additive(&mut self, operator: AdditiveOperator, left: Type, right: Type) {
        use Type::{Int, IntPointer};

        let (acc, scratch, word) = (
            Register::ACCUMULATOR,
            Register::SCRATCH,
            Register::WORD_SIZE,
        );
        match (operator, left, right) {
            (AdditiveOperator::Plus, IntPointer, Int) => {
                self.emit(Instruction::mult(acc, word));
                self.emit(Instruction::Mflo(acc));
                self.emit(Instruction::add(acc, scratch, acc));
            }
            (AdditiveOperator::Plus, Int, IntPointer) => {
                self.emit(Instruction::mult(scratch, word));
                self.emit(Instruction::Mflo(scratch));
                self.emit(Instruction::add(acc, scratch, acc));
            }
            (AdditiveOperator::Plus, _, _) => self.emit(Instruction::add(acc, scratch, acc)),
            (AdditiveOperator::Minus, IntPointer, Int) => {
                self.emit(Instruction::mult(acc, word));
                self.emit(Instruction::Mflo(acc));
                self.emit(Instruction::sub(acc, scratch, acc));
            }
            (AdditiveOperator::Minus, IntPointer, IntPointer) => {
                self.emit(Instruction::sub(acc, scratch, acc));
                self.emit(Instruction::divu(acc, word));
                self.emit(Instruction::Mflo(acc));
            }
            (AdditiveOperator::Minus, _, _) => self.emit(Instruction::sub(acc, scratch, acc)),
        }
    }

    pub(super) fn lower_term(&mut self, term: &SyntaxNode) -> Result<(), CodegenError> {
        match term.production() {
            Some(Production::TermFactor) => self.lower_factor(term.child(0)),
            Some(Production::TermBinary(operator)) => {
                self.lower_operands(
                    |generator| generator.lower_term(term.child(0)),
                    |generator| generator.lower_factor(term.child(2)),
                )?;

                let (acc, scratch) = (Register::ACCUMULATOR, Register::SCRATCH);
                match operator {
                    MultiplicativeOperator::Star => {
                        self.emit(Instruction::mult(scratch, acc));
                        self.emit(Instruction::Mflo(acc));
                    }
                    MultiplicativeOperator::Slash => {
                        self.emit(Instruction::div(scratch, acc));
                        self.emit(Instruction::Mflo(acc));
                    }
                    MultiplicativeOperator::Pct => {
                        self.emit(Instruction::div(scratch, acc));
                        self.emit(Instruction::Mfhi(acc));
                    }
                }
                Ok(())
            }
            _ => Err(CodegenError::unexpected_node("term", term.production_name())),
        }
    }

    #[tracing::instrument(skip(self, factor), level = "trace", fields(production = factor.production_name()))]
    pub(super) fn lower_factor(&mut self, factor: &SyntaxNode) -> Result<(), CodegenError> {
        match factor.production() {
            Some(Production::FactorId) => {
                let offset = self.offset_of(factor.child(0).lexeme())?;
                self.emit(Instruction::lw(
                    Register::ACCUMULATOR,
                    offset,
                    Register::FRAME_POINTER,
                ));
                Ok(())
            }
            Some(Production::FactorNum) => {
                let value = Self::literal_value(factor.child(0).lexeme())?;
                self.load_constant(Register::ACCUMULATOR, value);
                Ok(())
            }
            Some(Production::FactorNull) => {
                self.emit(Instruction::add(
                    Register::ACCUMULATOR,
                    Register::ZERO,
                    Register::NULL_SENTINEL,
                ));
                Ok(())
            }
            Some(Production::FactorParen) => self.lower_expr(factor.child(1)),
            Some(Production::FactorAddressOf) => self.lower_address_of(factor.child(1)),
            Some(Production::FactorDeref) => {
                self.lower_factor(factor.child(1))?;
                self.emit(Instruction::lw(Register::ACCUMULATOR, 0, Register::ACCUMULATOR));
                Ok(())
            }
            Some(Production::FactorNew) => self.lower_allocation(factor.child(3)),
            Some(Production::FactorCall) => self.lower_call(factor.child(0).lexeme(), &[]),
            Some(Production::FactorCallArgs) => {
                let arguments = factor.child(2).argument_list();
                self.lower_call(factor.child(0).lexeme(), &arguments)
            }
            _ => Err(CodegenError::unexpected_node(
                "factor",
                factor.production_name(),
            )),
        }
    }

    /// Leaves the address an lvalue designates in `$3`.
    fn lower_address_of(&mut self, lvalue: &SyntaxNode) -> Result<(), CodegenError> {
        match lvalue.production() {
            Some(Production::LvalueId) => {
                let offset = self.offset_of(lvalue.child(0).lexeme())?;
                self.load_constant(Register::ACCUMULATOR, WordValue::Literal(offset.into()));
                self.emit(Instruction::add(
                    Register::ACCUMULATOR,
                    Register::ACCUMULATOR,
                    Register::FRAME_POINTER,
                ));
                Ok(())
            }
            // &*p is p
            Some(Production::LvalueDeref) => self.lower_factor(lvalue.child(1)),
            Some(Production::LvalueParen) => self.lower_address_of(lvalue.child(1)),
            _ => Err(CodegenError::unexpected_node(
                "lvalue",
                lvalue.production_name(),
            )),
        }
    }

    /// Leaves 1 in `$3` when the comparison holds and 0 otherwise. Pointers compare unsigned.
    pub(super) fn lower_test(&mut self, test: &SyntaxNode) -> Result<(), CodegenError> {
        let Some(Production::Test(comparison)) = test.production() else {
            return Err(CodegenError::unexpected_node("test", test.production_name()));
        };

        let operand_type = self.checker.type_of_test_operands(test)?;
        self.lower_operands(
            |generator| generator.lower_expr(test.child(0)),
            |generator| generator.lower_expr(test.child(2)),
        )?;

        let less_than: fn(Register, Register, Register) -> Instruction = match operand_type {
            Type::Int => Instruction::slt,
            Type::IntPointer => Instruction::sltu,
        };
        let (acc, left, one) = (
            Register::ACCUMULATOR,
            Register::SCRATCH,
            Register::NULL_SENTINEL,
        );
        match comparison {
            Comparison::Eq | Comparison::Ne => {
                self.emit(less_than(Register::SCRATCH_LOW, acc, left));
                self.emit(less_than(Register::SCRATCH_HIGH, left, acc));
                self.emit(Instruction::add(
                    acc,
                    Register::SCRATCH_LOW,
                    Register::SCRATCH_HIGH,
                ));
                if comparison == Comparison::Eq {
                    self.emit(Instruction::sub(acc, one, acc));
                }
            }
            Comparison::Lt => self.emit(less_than(acc, left, acc)),
            Comparison::Gt => self.emit(less_than(acc, acc, left)),
            Comparison::Le => {
                self.emit(less_than(acc, acc, left));
                self.emit(Instruction::sub(acc, one, acc));
            }
            Comparison::Ge => {
                self.emit(less_than(acc, left, acc));
                self.emit(Instruction::sub(acc, one, acc));
            }
        }

        Ok(())
    }

    /// Saves `$29` and `$31`, pushes the arguments left to right, links to the callee, then
    /// drops the arguments and restores both registers.
    fn lower_call(&mut self, callee: &str, arguments: &[&SyntaxNode]) -> Result<(), CodegenError> {
        self.push(Register::FRAME_POINTER);
        self.push(Register::RETURN_ADDRESS);

        for argument in arguments {
            self.lower_expr(argument)?;
            self.push(Register::ACCUMULATOR);
        }

        self.load_constant(Register::SCRATCH, WordValue::Label(procedure_label(callee)));
        self.emit(Instruction::Jalr(Register::SCRATCH));

        if !arguments.is_empty() {
            let argument_bytes = i64::from(Target::word_size()) * arguments.len() as i64;
            self.load_constant(Register::SCRATCH, WordValue::Literal(argument_bytes));
            self.emit(Instruction::add(
                Register::STACK_POINTER,
                Register::STACK_POINTER,
                Register::SCRATCH,
            ));
        }

        self.pop(Register::RETURN_ADDRESS);
        self.pop(Register::FRAME_POINTER);
        Ok(())
    }
}
