//! Renders lowered IR type references to Rust type syntax.
//!
//! Grounded on the teacher's `generator/type_mapper.rs`: the same scalar
//! table (`string -> String`, `int -> i32`, ...) and the same
//! collection-before-option wrapping order (`Option<Vec<T>>`, never
//! `Vec<Option<T>>`). The teacher mapped straight from a `QName` and a
//! pair of `(min_occurs, max_occurs)` strings read fresh at codegen time;
//! here the same decisions were already made once, during IR lowering
//! (`crate::ir::lower_cardinality`), so this module only has to render
//! what `crate::ir` already decided.

use crate::ir::{Cardinality, IrModule, Primitive, TypeRef};

/// The bare type name a [`TypeRef`] names, with no cardinality wrapper
/// and no `Box` (callers needing a field's full declared type should use
/// [`render_field_type`]).
pub fn render_type_ref(module: &IrModule, type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Primitive(p) => p.rust_name().to_string(),
        TypeRef::Named(id) => module.name_of(*id).to_string(),
    }
}

/// The full declared type of a struct field: the base type, boxed if the
/// field needs indirection (spec.md §9), wrapped in `Vec`/`Option` per its
/// cardinality.
pub fn render_field_type(
    module: &IrModule,
    type_ref: &TypeRef,
    cardinality: Cardinality,
    needs_indirection: bool,
) -> String {
    let base = render_type_ref(module, type_ref);
    let base = if needs_indirection {
        format!("Box<{base}>")
    } else {
        base
    };
    match cardinality {
        Cardinality::RequiredSingle => base,
        Cardinality::OptionalSingle => format!("Option<{base}>"),
        Cardinality::RequiredList => format!("Vec<{base}>"),
        Cardinality::OptionalList => format!("Option<Vec<{base}>>"),
    }
}

pub fn primitive_default(p: Primitive) -> &'static str {
    match p {
        Primitive::String => "String::new()",
        Primitive::Bool => "false",
        Primitive::Bytes => "Vec::new()",
        Primitive::F32 | Primitive::F64 => "0.0",
        _ => "0",
    }
}
