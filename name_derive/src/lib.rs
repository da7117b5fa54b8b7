/// Static name of a type, used to tag tracing spans with the kind of tree being walked.
pub trait NameReflectable {
    fn reflect_name() -> &'static str;
}

/// Name of the variant a value currently holds. Derived only for enums.
pub trait VariantReflectable {
    fn variant_name(&self) -> &'static str;
}

pub use name_derive_macro::{ReflectName, ReflectVariant};
