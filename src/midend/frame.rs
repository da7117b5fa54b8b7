use serde::Serialize;

use crate::{
    backend::arch::TargetArchitecture,
    midend::{symtab::Procedure, types::Type},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SlotKind {
    Parameter,
    Local,
}

/// Where one variable lives, as a byte offset from the frame pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameSlot {
    pub name: String,
    pub type_: Type,
    pub offset: i32,
    pub kind: SlotKind,
}

/// Frame-pointer-relative placement of every local of one procedure.
///
/// Ordinary procedures find their parameters above the frame pointer, where the caller pushed
/// them (the last parameter closest), and their other locals at 0, -word, -2·word, ...
/// The entry procedure receives its parameters in registers and spills them into the frame
/// alongside its locals, so every one of its locals is laid out downward from 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    procedure: String,
    slots: Vec<FrameSlot>,
    reserved_bytes: i32,
}

impl FrameLayout {
    pub fn for_procedure<Target>(procedure: &Procedure) -> Self
    where
        Target: TargetArchitecture,
    {
        let word = Target::word_size();
        let mut slots = Vec::with_capacity(procedure.local_count());

        let mut local_offset = 0;
        if procedure.is_entry() {
            for (name, variable) in procedure.locals() {
                let kind = if procedure.is_parameter(name) {
                    SlotKind::Parameter
                } else {
                    SlotKind::Local
                };
                slots.push(FrameSlot {
                    name: name.clone(),
                    type_: variable.type_(),
                    offset: local_offset,
                    kind,
                });
                local_offset -= word;
            }
        } else {
            let parameter_bytes = word * procedure.parameters().len() as i32;
            for (index, parameter) in procedure.parameters().iter().enumerate() {
                slots.push(FrameSlot {
                    name: parameter.name.clone(),
                    type_: parameter.type_(),
                    offset: parameter_bytes - word * index as i32,
                    kind: SlotKind::Parameter,
                });
            }

            for (name, variable) in procedure.locals() {
                if procedure.is_parameter(name) {
                    continue;
                }
                slots.push(FrameSlot {
                    name: name.clone(),
                    type_: variable.type_(),
                    offset: local_offset,
                    kind: SlotKind::Local,
                });
                local_offset -= word;
            }
        }

        // the stack pointer moves down past every slot at or below the frame pointer
        let reserved_bytes = -local_offset;

        FrameLayout {
            procedure: procedure.name().into(),
            slots,
            reserved_bytes,
        }
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Slots in symbol-table order: parameters first, then locals in declaration order.
    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&FrameSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn offset_of(&self, name: &str) -> Option<i32> {
        self.slot(name).map(|slot| slot.offset)
    }

    /// Bytes the prologue reserves below the frame pointer for the slots it owns.
    pub fn reserved_bytes(&self) -> i32 {
        self.reserved_bytes
    }
}
