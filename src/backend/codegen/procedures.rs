//! Prologues, epilogues and local initialization.

use crate::{
    backend::{
        arch::{Register, TargetArchitecture},
        codegen::{procedure_label, CodegenError, ProcedureGenerator, INITIALIZE_ROUTINE},
        instruction::{Instruction, WordValue},
    },
    frontend::Production,
};

impl<Target> ProcedureGenerator<'_, '_, Target>
where
    Target: TargetArchitecture,
{
    pub(super) fn generate_entry(&mut self) -> Result<(), CodegenError> {
        let procedure = self.procedure();
        self.comment(&format!("{}:", procedure.name()));
        self.comment("prolog");

        self.load_constant(
            Register::WORD_SIZE,
            WordValue::Literal(Target::word_size().into()),
        );
        self.load_constant(
            Register::NULL_SENTINEL,
            WordValue::Literal(Target::null_sentinel().into()),
        );
        self.push(Register::RETURN_ADDRESS);
        self.emit(Instruction::sub(
            Register::FRAME_POINTER,
            Register::STACK_POINTER,
            Register::WORD_SIZE,
        ));

        // init reads an array's base and length from $1/$2; a plain int argument means no array
        let first_is_array = procedure
            .parameters()
            .first()
            .is_some_and(|parameter| parameter.type_().is_pointer());
        if first_is_array {
            self.call_routine(INITIALIZE_ROUTINE);
        } else {
            self.push(Register::SECOND_ARGUMENT);
            self.emit(Instruction::add(
                Register::SECOND_ARGUMENT,
                Register::ZERO,
                Register::ZERO,
            ));
            self.call_routine(INITIALIZE_ROUTINE);
            self.pop(Register::SECOND_ARGUMENT);
        }

        self.comment("body");
        self.emit_symbol_table();
        self.reserve_frame();

        let argument_registers = [Register::ARGUMENT, Register::SECOND_ARGUMENT];
        for (parameter, register) in procedure.parameters().iter().zip(argument_registers) {
            let offset = self.offset_of(&parameter.name)?;
            self.emit(Instruction::sw(register, offset, Register::FRAME_POINTER));
        }

        self.generate_body()?;

        self.comment("epilog");
        self.emit(Instruction::add(
            Register::STACK_POINTER,
            Register::FRAME_POINTER,
            Register::WORD_SIZE,
        ));
        self.pop(Register::RETURN_ADDRESS);
        self.emit(Instruction::Jr(Register::RETURN_ADDRESS));

        Ok(())
    }

    pub(super) fn generate_ordinary(&mut self) -> Result<(), CodegenError> {
        let name = self.procedure().name();
        self.emit(Instruction::label(&procedure_label(name)));
        self.comment("prolog");
        self.emit(Instruction::sub(
            Register::FRAME_POINTER,
            Register::STACK_POINTER,
            Register::WORD_SIZE,
        ));

        self.comment("body");
        self.emit_symbol_table();
        self.reserve_frame();

        self.generate_body()?;

        self.comment("epilog");
        self.emit(Instruction::add(
            Register::STACK_POINTER,
            Register::FRAME_POINTER,
            Register::WORD_SIZE,
        ));
        self.emit(Instruction::Jr(Register::RETURN_ADDRESS));

        Ok(())
    }

    /// Initializers, statements, then the return expression, whose value is left in `$3`.
    fn generate_body(&mut self) -> Result<(), CodegenError> {
        let procedure = self.procedure();
        self.store_initializers()?;

        self.comment("statements");
        self.lower_statements(procedure.statements())?;

        self.comment("return");
        self.lower_expr(procedure.return_expression())
    }

    fn emit_symbol_table(&mut self) {
        let lines: Vec<String> = self
            .layout
            .slots()
            .iter()
            .map(|slot| format!(" {}   {}   {}", slot.name, slot.type_, slot.offset))
            .collect();

        self.comment("symbol table");
        for line in lines {
            self.comment(&line);
        }
    }

    fn reserve_frame(&mut self) {
        self.load_constant(
            Register::ACCUMULATOR,
            WordValue::Literal(self.layout.reserved_bytes().into()),
        );
        self.emit(Instruction::sub(
            Register::STACK_POINTER,
            Register::STACK_POINTER,
            Register::ACCUMULATOR,
        ));
    }

    fn store_initializers(&mut self) -> Result<(), CodegenError> {
        self.comment("locals");
        for declaration in self.procedure().declarations().declaration_list() {
            let name = declaration.child(1).child(1).lexeme();
            match declaration.production() {
                Some(Production::DclsNull) => self.emit(Instruction::add(
                    Register::ACCUMULATOR,
                    Register::ZERO,
                    Register::NULL_SENTINEL,
                )),
                _ => {
                    let value = Self::literal_value(declaration.child(3).lexeme())?;
                    self.load_constant(Register::ACCUMULATOR, value);
                }
            }

            let offset = self.offset_of(name)?;
            self.emit(Instruction::sw(
                Register::ACCUMULATOR,
                offset,
                Register::FRAME_POINTER,
            ));
        }

        Ok(())
    }

    pub(super) fn literal_value(lexeme: &str) -> Result<WordValue, CodegenError> {
        lexeme
            .parse::<i64>()
            .map(WordValue::Literal)
            .map_err(|_| CodegenError::InvalidLiteral(lexeme.into()))
    }
}
