//! Field Descriptors
//!
//! A descriptor table is a `&'static [Field<R>]`: one entry per wire key of
//! record type `R`, in declaration order. Each entry pairs the key with a
//! [`Slot`], which carries typed accessors into `R` instead of a byte offset,
//! so one generic routine ([`super::decode_into`]) serves every record type.
//!
//! Tables are normally produced by the [`record!`](crate::record) macro.

use std::fmt;

use serde_json::Value;

use super::DecodeError;

/// Wire type expected by a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    BoolNullable,
    Int,
    IntNullable,
    Double,
    DoubleNullable,
    Str,
    StrNullable,
    Object,
    ObjectNullable,
    Array,
}

impl FieldKind {
    /// Whether an explicit JSON `null` satisfies this kind
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            Self::BoolNullable
                | Self::IntNullable
                | Self::DoubleNullable
                | Self::StrNullable
                | Self::ObjectNullable
        )
    }

    /// Check a node's runtime type against this kind
    #[must_use]
    pub fn accepts(self, node: &Value) -> bool {
        if node.is_null() {
            return self.is_nullable();
        }
        match self {
            Self::Bool | Self::BoolNullable => node.is_boolean(),
            Self::Int | Self::IntNullable | Self::Double | Self::DoubleNullable => {
                node.is_number()
            }
            Self::Str | Self::StrNullable => node.is_string(),
            Self::Object | Self::ObjectNullable => node.is_object(),
            Self::Array => node.is_array(),
        }
    }

    /// Short human-readable name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::BoolNullable => "bool or null",
            Self::Int => "int",
            Self::IntNullable => "int or null",
            Self::Double => "double",
            Self::DoubleNullable => "double or null",
            Self::Str => "string",
            Self::StrNullable => "string or null",
            Self::Object => "object",
            Self::ObjectNullable => "object or null",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed accessor pair for a scalar field of `R`
pub struct Lens<R, T> {
    pub get: fn(&R) -> &T,
    pub get_mut: fn(&mut R) -> &mut T,
}

/// Operations for a field holding another record (object, nullable object
/// or array of objects). The function pointers are monomorphised per field
/// by the `record!` macro.
pub struct Nested<R> {
    /// Decode `node` into the field, replacing its previous value
    pub decode: fn(&Value, &mut R) -> Result<(), DecodeError>,
    /// Release nested arrays held by the field
    pub release: fn(&mut R),
    /// Pretty-print the field's value at the given nesting level
    pub pretty: fn(&R, &mut dyn fmt::Write, usize) -> fmt::Result,
}

/// Where and how a decoded value is stored
pub enum Slot<R> {
    Bool(Lens<R, bool>),
    BoolNullable(Lens<R, Option<bool>>),
    Int(Lens<R, i64>),
    IntNullable(Lens<R, Option<i64>>),
    Double(Lens<R, f64>),
    DoubleNullable(Lens<R, Option<f64>>),
    Str(Lens<R, String>),
    StrNullable(Lens<R, Option<String>>),
    Object(Nested<R>),
    ObjectNullable(Nested<R>),
    Array(Nested<R>),
}

/// One entry of a descriptor table
pub struct Field<R> {
    /// Key in the source payload
    pub name: &'static str,
    pub slot: Slot<R>,
}

impl<R> Field<R> {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self.slot {
            Slot::Bool(_) => FieldKind::Bool,
            Slot::BoolNullable(_) => FieldKind::BoolNullable,
            Slot::Int(_) => FieldKind::Int,
            Slot::IntNullable(_) => FieldKind::IntNullable,
            Slot::Double(_) => FieldKind::Double,
            Slot::DoubleNullable(_) => FieldKind::DoubleNullable,
            Slot::Str(_) => FieldKind::Str,
            Slot::StrNullable(_) => FieldKind::StrNullable,
            Slot::Object(_) => FieldKind::Object,
            Slot::ObjectNullable(_) => FieldKind::ObjectNullable,
            Slot::Array(_) => FieldKind::Array,
        }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A record type with a static descriptor table.
pub trait Record: Default + 'static {
    /// Type name used in diagnostics
    const NAME: &'static str;

    /// The record's wire mapping, in declaration order
    fn fields() -> &'static [Field<Self>];
}
