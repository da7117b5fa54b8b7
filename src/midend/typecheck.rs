use name_derive::NameReflectable;

use crate::{
    frontend::{AdditiveOperator, Production, SyntaxNode},
    midend::{
        symtab::{
            Mismatch, OperatorMisuse, Procedure, ProcedureRegistry, SemanticError,
        },
        types::Type,
    },
    trace,
};

/// Checks one procedure against the two-type system.
///
/// The `type_of_*` queries depend only on the subtree and the procedure's locals, so the code
/// generator asks the same questions again to pick pointer-aware instruction sequences.
pub struct TypeChecker<'a, 'tree> {
    procedure: &'a Procedure<'tree>,
    registry: &'a ProcedureRegistry<'tree>,
}

impl<'a, 'tree> TypeChecker<'a, 'tree> {
    pub fn new(procedure: &'a Procedure<'tree>, registry: &'a ProcedureRegistry<'tree>) -> Self {
        Self {
            procedure,
            registry,
        }
    }

    pub fn procedure(&self) -> &'a Procedure<'tree> {
        self.procedure
    }

    /// Checks declarations, statements and the return expression, stopping at the first error.
    pub fn check(&self) -> Result<(), SemanticError> {
        let _span = trace::span_auto!(
            trace::Level::DEBUG,
            "Type check procedure",
            name = self.procedure.name()
        );

        self.check_declarations(self.procedure.declarations())?;
        self.check_statements(self.procedure.statements())?;

        let returned = self.type_of_expr(self.procedure.return_expression())?;
        if returned != Type::Int {
            return Err(SemanticError::ReturnTypeError {
                procedure: self.procedure.name().into(),
                found: returned,
            });
        }

        trace::debug!("procedure {} is well typed", self.procedure.name());
        Ok(())
    }

    /// `int` declarations take a number, `int*` declarations take `NULL`.
    pub fn check_declarations(&self, dcls: &SyntaxNode) -> Result<(), SemanticError> {
        for declaration in dcls.declaration_list() {
            let dcl = declaration.child(1);
            let declared = Type::of_type_clause(dcl.child(0));
            let initializer = match declaration.production() {
                Some(Production::DclsNull) => Type::IntPointer,
                _ => Type::Int,
            };

            if declared != initializer {
                return Err(Mismatch::Initializer {
                    name: dcl.child(1).lexeme().into(),
                    declared,
                }
                .into());
            }
        }

        Ok(())
    }

    pub fn check_statements(&self, statements: &SyntaxNode) -> Result<(), SemanticError> {
        for statement in statements.statement_list() {
            self.check_statement(statement)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, statement), level = "trace", fields(tree_name = SyntaxNode::reflect_name(), production = statement.production_name()))]
    pub fn check_statement(&self, statement: &SyntaxNode) -> Result<(), SemanticError> {
        match statement.production() {
            Some(Production::Assign) => {
                let lvalue = self.type_of_lvalue(statement.child(0))?;
                let value = self.type_of_expr(statement.child(2))?;
                if lvalue != value {
                    return Err(Mismatch::Assignment { lvalue, value }.into());
                }
            }
            Some(Production::If) => {
                self.type_of_test_operands(statement.child(2))?;
                self.check_statements(statement.child(5))?;
                self.check_statements(statement.child(9))?;
            }
            Some(Production::While) => {
                self.type_of_test_operands(statement.child(2))?;
                self.check_statements(statement.child(5))?;
            }
            Some(Production::Println) => {
                let printed = self.type_of_expr(statement.child(2))?;
                if printed != Type::Int {
                    return Err(OperatorMisuse::Print(printed).into());
                }
            }
            Some(Production::Delete) => {
                let deleted = self.type_of_expr(statement.child(3))?;
                if deleted != Type::IntPointer {
                    return Err(OperatorMisuse::Delete(deleted).into());
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Both sides of a comparison must have the same type; that shared type is returned since
    /// the comparison itself has none.
    pub fn type_of_test_operands(&self, test: &SyntaxNode) -> Result<Type, SemanticError> {
        let left = self.type_of_expr(test.child(0))?;
        let right = self.type_of_expr(test.child(2))?;

        match test.production() {
            Some(Production::Test(comparison)) if left != right => {
                Err(OperatorMisuse::Comparison(comparison, left, right).into())
            }
            _ => Ok(left),
        }
    }

    #[tracing::instrument(skip(self, expr), level = "trace", fields(production = expr.production_name()))]
    pub fn type_of_expr(&self, expr: &SyntaxNode) -> Result<Type, SemanticError> {
        match expr.production() {
            Some(Production::ExprBinary(operator)) => {
                let left = self.type_of_expr(expr.child(0))?;
                let right = self.type_of_term(expr.child(2))?;
                Self::additive_result(operator, left, right)
            }
            _ => self.type_of_term(expr.child(0)),
        }
    }

    fn additive_result(
        operator: AdditiveOperator,
        left: Type,
        right: Type,
    ) -> Result<Type, SemanticError> {
        use Type::{Int, IntPointer};

        match (operator, left, right) {
            (AdditiveOperator::Plus, Int, Int) => Ok(Int),
            (AdditiveOperator::Plus, IntPointer, Int) | (AdditiveOperator::Plus, Int, IntPointer) => {
                Ok(IntPointer)
            }
            (AdditiveOperator::Plus, IntPointer, IntPointer) => {
                Err(OperatorMisuse::Addition(left, right).into())
            }
            (AdditiveOperator::Minus, Int, Int) | (AdditiveOperator::Minus, IntPointer, IntPointer) => {
                Ok(Int)
            }
            (AdditiveOperator::Minus, IntPointer, Int) => Ok(IntPointer),
            (AdditiveOperator::Minus, Int, IntPointer) => {
                Err(OperatorMisuse::Subtraction(left, right).into())
            }
        }
    }

    pub fn type_of_term(&self, term: &SyntaxNode) -> Result<Type, SemanticError> {
        match term.production() {
            Some(Production::TermBinary(operator)) => {
                let left = self.type_of_term(term.child(0))?;
                let right = self.type_of_factor(term.child(2))?;
                if left == Type::Int && right == Type::Int {
                    Ok(Type::Int)
                } else {
                    Err(OperatorMisuse::Multiplicative(operator, left, right).into())
                }
            }
            _ => self.type_of_factor(term.child(0)),
        }
    }

    pub fn type_of_factor(&self, factor: &SyntaxNode) -> Result<Type, SemanticError> {
        match factor.production() {
            Some(Production::FactorId) => self.type_of_name(factor.child(0).lexeme()),
            Some(Production::FactorNull) => Ok(Type::IntPointer),
            Some(Production::FactorParen) => self.type_of_expr(factor.child(1)),
            Some(Production::FactorAddressOf) => match self.type_of_lvalue(factor.child(1))? {
                Type::Int => Ok(Type::IntPointer),
                other => Err(OperatorMisuse::AddressOf(other).into()),
            },
            Some(Production::FactorDeref) => self.type_of_dereference(factor.child(1)),
            Some(Production::FactorNew) => match self.type_of_expr(factor.child(3))? {
                Type::Int => Ok(Type::IntPointer),
                other => Err(OperatorMisuse::Allocation(other).into()),
            },
            Some(Production::FactorCall) => {
                self.check_call(factor.child(0).lexeme(), &[])?;
                Ok(Type::Int)
            }
            Some(Production::FactorCallArgs) => {
                let arguments = factor.child(2).argument_list();
                self.check_call(factor.child(0).lexeme(), &arguments)?;
                Ok(Type::Int)
            }
            _ => Ok(Type::Int),
        }
    }

    pub fn type_of_lvalue(&self, lvalue: &SyntaxNode) -> Result<Type, SemanticError> {
        match lvalue.production() {
            Some(Production::LvalueDeref) => self.type_of_dereference(lvalue.child(1)),
            Some(Production::LvalueParen) => self.type_of_lvalue(lvalue.child(1)),
            _ => self.type_of_name(lvalue.child(0).lexeme()),
        }
    }

    fn type_of_dereference(&self, operand: &SyntaxNode) -> Result<Type, SemanticError> {
        match self.type_of_factor(operand)? {
            Type::IntPointer => Ok(Type::Int),
            other => Err(OperatorMisuse::Dereference(other).into()),
        }
    }

    fn type_of_name(&self, name: &str) -> Result<Type, SemanticError> {
        Ok(self.procedure.lookup_variable(name)?.type_())
    }

    /// Argument types are computed before the callee is resolved, so errors inside an argument
    /// win over errors about the call itself.
    fn check_call(&self, callee_name: &str, arguments: &[&SyntaxNode]) -> Result<(), SemanticError> {
        let argument_types = arguments
            .iter()
            .map(|argument| self.type_of_expr(argument))
            .collect::<Result<Vec<_>, _>>()?;

        let callee = self.registry.lookup_callable(callee_name)?;
        let parameters = callee.parameters();
        if parameters.len() != argument_types.len() {
            return Err(Mismatch::CallArity {
                procedure: callee_name.into(),
                expected: parameters.len(),
                found: argument_types.len(),
            }
            .into());
        }

        for (position, (parameter, found)) in parameters.iter().zip(argument_types).enumerate() {
            if parameter.type_() != found {
                return Err(Mismatch::CallArgument {
                    procedure: callee_name.into(),
                    position: position + 1,
                    expected: parameter.type_(),
                    found,
                }
                .into());
            }
        }

        Ok(())
    }
}
