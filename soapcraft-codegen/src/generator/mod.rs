//! Emitter (spec.md §4.5): the only stage that knows Rust's concrete
//! surface syntax. Everything it needs was already decided by
//! [`crate::ir`] -- field names, cardinalities, operation signatures -- so
//! this module is a pure, deterministic pretty-printer: identical
//! [`crate::ir::IrModule`] input renders byte-identical output.

pub mod rust_codegen;
pub mod type_mapper;

pub use rust_codegen::generate_client_code;
