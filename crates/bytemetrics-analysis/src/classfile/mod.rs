//! JVM class-file decoding.
//!
//! Turns one compiled artifact into a [`DecodedUnit`]: its name, supertypes,
//! declared members, the member-access facts of every method body, and the
//! deduplicated list of references to other units.

pub mod bytecode;
pub mod constant_pool;
pub mod decoder;
pub mod descriptor;
pub mod reader;
pub mod types;

pub use decoder::{decode, ClassDecoder};
pub use types::{
    field_id, method_id, DecodedUnit, FieldInfo, MemberRef, MethodBody, MethodInfo, RawReference,
    ReferenceKind, UnitKind,
};
