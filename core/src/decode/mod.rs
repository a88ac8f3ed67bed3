//! Schema-Driven Decode Engine
//!
//! Turns parsed JSON trees into typed records through declarative
//! descriptor tables.
//!
//! # Architecture
//!
//! ```text
//! record! { .. } ──► struct + static [Field<R>] table
//!                                  │
//! serde_json::Value ──► decode_with(tree, table, &mut R) ──► R
//!                                  │
//!            decode_choice (bool tag) / decode_switch (string tag)
//!                                  │
//!                   Decoded<R> = R + backing store, release()
//! ```
//!
//! Records own their data (`String`, `Vec`), so a decoded value never
//! borrows from the tree; [`Decoded`] still keeps the tree as the backing
//! store so teardown follows one explicit release path.

mod decoded;
mod descriptor;
mod engine;
mod error;
mod macros;
mod pretty;

pub use serde_json::Value;

pub use decoded::{release_slot, Decoded, Release};
pub use descriptor::{Field, FieldKind, Lens, Nested, Record, Slot};
pub use engine::{
    decode, decode_array_into, decode_choice, decode_discriminator, decode_into,
    decode_nullable_into, decode_owned, decode_switch, decode_with, force_decode, release_array,
    release_nullable, release_record, Choice, SwitchEntry, Switched,
};
pub use error::{ContractViolation, DecodeError};
pub use pretty::{pretty_array, pretty_nullable, pretty_object, pretty_record, Pretty};
