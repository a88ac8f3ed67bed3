//! Generic decode routines
//!
//! Everything here is driven by descriptor tables; no record type has
//! hand-written parsing code.
//!
//! # Rules
//!
//! - The root must be an object, otherwise [`DecodeError::InvalidJson`].
//! - Unknown keys are skipped so the server can add fields freely.
//! - A known key with the wrong runtime type fails immediately with
//!   [`DecodeError::IncorrectType`] carrying the node.
//! - After the whole object has been scanned, the number of matched keys
//!   must equal the table length, otherwise [`DecodeError::PartiallyParsed`].

use serde_json::Value;

use super::decoded::{Decoded, Release};
use super::descriptor::{Field, Lens, Record, Slot};
use super::error::{excerpt, ContractViolation, DecodeError};

/// Decode `tree` into `out` using an explicit descriptor table.
///
/// On failure `out` may be partially written.
pub fn decode_with<R>(tree: &Value, fields: &[Field<R>], out: &mut R) -> Result<(), DecodeError> {
    let Value::Object(map) = tree else {
        return Err(DecodeError::InvalidJson);
    };

    let mut matched = 0usize;
    for (key, node) in map {
        let Some(field) = fields.iter().find(|field| field.name == key) else {
            continue;
        };
        let expected = field.kind();
        if !expected.accepts(node) {
            return Err(DecodeError::IncorrectType {
                field: field.name,
                expected,
                node: node.clone(),
            });
        }
        store(&field.slot, node, out)?;
        matched += 1;
    }

    if matched != fields.len() {
        let missing = fields
            .iter()
            .filter(|field| !map.contains_key(field.name))
            .map(|field| field.name)
            .collect();
        return Err(DecodeError::PartiallyParsed { missing });
    }
    Ok(())
}

fn store<R>(slot: &Slot<R>, node: &Value, out: &mut R) -> Result<(), DecodeError> {
    match slot {
        Slot::Bool(lens) => *(lens.get_mut)(out) = node.as_bool() == Some(true),
        Slot::BoolNullable(lens) => *(lens.get_mut)(out) = node.as_bool(),
        Slot::Int(lens) => *(lens.get_mut)(out) = as_int(node),
        Slot::IntNullable(lens) => *(lens.get_mut)(out) = (!node.is_null()).then(|| as_int(node)),
        Slot::Double(lens) => *(lens.get_mut)(out) = node.as_f64().unwrap_or_default(),
        Slot::DoubleNullable(lens) => *(lens.get_mut)(out) = node.as_f64(),
        Slot::Str(lens) => *(lens.get_mut)(out) = node.as_str().unwrap_or_default().to_owned(),
        Slot::StrNullable(lens) => *(lens.get_mut)(out) = node.as_str().map(str::to_owned),
        Slot::Object(nested) | Slot::ObjectNullable(nested) | Slot::Array(nested) => {
            (nested.decode)(node, out)?;
        }
    }
    Ok(())
}

/// Integers accept any JSON number; fractions truncate toward zero.
fn as_int(node: &Value) -> i64 {
    node.as_i64()
        .or_else(|| node.as_f64().map(|value| value as i64))
        .unwrap_or_default()
}

/// Decode `tree` into an existing record
pub fn decode_into<R: Record>(tree: &Value, out: &mut R) -> Result<(), DecodeError> {
    decode_with(tree, R::fields(), out)
}

/// Decode `tree` into a fresh record
pub fn decode<R: Record>(tree: &Value) -> Result<R, DecodeError> {
    let mut out = R::default();
    decode_into(tree, &mut out)?;
    Ok(out)
}

/// Decode and keep `tree` alive as the record's backing store
pub fn decode_owned<R: Record + Release>(tree: Value) -> Result<Decoded<R>, DecodeError> {
    let value = decode(&tree)?;
    Ok(Decoded::new(value, tree))
}

/// Decode-or-fail for payloads from the trusted server.
///
/// A shape mismatch here is a client/server contract violation; callers
/// propagate it to the fatal exit path rather than showing it to the user.
pub fn force_decode<R: Record + Release>(tree: Value) -> Result<Decoded<R>, ContractViolation> {
    match decode(&tree) {
        Ok(value) => Ok(Decoded::new(value, tree)),
        Err(source) => Err(ContractViolation {
            record: R::NAME,
            source,
            excerpt: excerpt(&tree),
        }),
    }
}

// ============================================================================
// Nested field helpers (called from `record!` expansions)
// ============================================================================

/// Decode an object-or-null node into an optional record
pub fn decode_nullable_into<N: Record>(node: &Value, slot: &mut Option<N>) -> Result<(), DecodeError> {
    if node.is_null() {
        *slot = None;
        return Ok(());
    }
    *slot = Some(decode(node)?);
    Ok(())
}

/// Decode an array of objects.
///
/// Elements are built in a fresh buffer; an element failure drops the
/// buffer and leaves `slot` untouched.
pub fn decode_array_into<N: Record>(node: &Value, slot: &mut Vec<N>) -> Result<(), DecodeError> {
    let Value::Array(items) = node else {
        return Err(DecodeError::InvalidJson);
    };
    let mut buffer = Vec::with_capacity(items.len());
    for item in items {
        buffer.push(decode::<N>(item)?);
    }
    *slot = buffer;
    Ok(())
}

/// Walk a record's nested fields and release every array buffer
pub fn release_record<R: Record>(record: &mut R) {
    for field in R::fields() {
        if let Slot::Object(nested) | Slot::ObjectNullable(nested) | Slot::Array(nested) =
            &field.slot
        {
            (nested.release)(record);
        }
    }
}

pub fn release_nullable<N: Record>(slot: &mut Option<N>) {
    if let Some(record) = slot.as_mut() {
        release_record(record);
    }
}

pub fn release_array<N: Record>(slot: &mut Vec<N>) {
    for record in slot.iter_mut() {
        release_record(record);
    }
    *slot = Vec::new();
}

// ============================================================================
// Discriminated unions
// ============================================================================

/// Decode only the boolean `name` through a one-entry table
pub fn decode_discriminator(tree: &Value, name: &'static str) -> Result<bool, DecodeError> {
    fn get(flag: &bool) -> &bool {
        flag
    }
    fn get_mut(flag: &mut bool) -> &mut bool {
        flag
    }

    let table = [Field {
        name,
        slot: Slot::Bool(Lens { get, get_mut }),
    }];
    let mut flag = false;
    decode_with(tree, &table, &mut flag)?;
    Ok(flag)
}

fn decode_tag(tree: &Value, name: &'static str) -> Result<String, DecodeError> {
    fn get(tag: &String) -> &String {
        tag
    }
    fn get_mut(tag: &mut String) -> &mut String {
        tag
    }

    let table = [Field {
        name,
        slot: Slot::Str(Lens { get, get_mut }),
    }];
    let mut tag = String::new();
    decode_with(tree, &table, &mut tag)?;
    Ok(tag)
}

/// Result of a boolean-discriminated decode
#[derive(Clone, Debug, PartialEq)]
pub enum Choice<T, F> {
    True(T),
    False(F),
}

impl<T: Release, F: Release> Release for Choice<T, F> {
    fn release(&mut self) {
        match self {
            Self::True(value) => value.release(),
            Self::False(value) => value.release(),
        }
    }
}

/// Decode the `T` branch when `discriminator` is true, otherwise `F`.
///
/// A missing or non-boolean discriminator fails before either branch is
/// attempted.
pub fn decode_choice<T: Record, F: Record>(
    tree: &Value,
    discriminator: &'static str,
) -> Result<Choice<T, F>, DecodeError> {
    if decode_discriminator(tree, discriminator)? {
        decode(tree).map(Choice::True)
    } else {
        decode(tree).map(Choice::False)
    }
}

/// One branch of a string-discriminated decode
pub struct SwitchEntry<E> {
    /// Discriminator value selecting this branch
    pub key: &'static str,
    pub decode: fn(&Value) -> Result<E, DecodeError>,
}

/// Winning branch of [`decode_switch`]
#[derive(Clone, Debug, PartialEq)]
pub struct Switched<E> {
    /// Ordinal of the matched entry
    pub index: usize,
    pub value: E,
}

/// Decode the entry whose key equals the string at `discriminator`
pub fn decode_switch<E>(
    tree: &Value,
    discriminator: &'static str,
    entries: &[SwitchEntry<E>],
) -> Result<Switched<E>, DecodeError> {
    let tag = decode_tag(tree, discriminator)?;
    let Some((index, entry)) = entries
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.key == tag)
    else {
        return Err(DecodeError::SwitchNotMatched {
            field: discriminator,
            value: tag,
        });
    };
    let value = (entry.decode)(tree)?;
    Ok(Switched { index, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    crate::record! {
        struct Point {
            x: Int,
            y: Int,
            label: StrNullable,
        }
    }

    crate::record! {
        struct Path {
            name: Str,
            points: Array<Point>,
        }
    }

    crate::record! {
        struct Failure {
            error: Str,
        }
    }

    #[test]
    fn test_decode_populates_every_field() {
        let point: Point = decode(&json!({"x": 1, "y": -2, "label": null})).unwrap();
        assert_eq!(
            point,
            Point {
                x: 1,
                y: -2,
                label: None
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let point: Point = decode(&json!({"x": 1, "y": 2, "label": "a", "z": [1, 2]})).unwrap();
        assert_eq!(point.label.as_deref(), Some("a"));
    }

    #[test]
    fn test_fractional_int_truncates() {
        let point: Point = decode(&json!({"x": 2.9, "y": -2.9, "label": null})).unwrap();
        assert_eq!((point.x, point.y), (2, -2));
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        assert_eq!(decode::<Point>(&json!([1, 2])), Err(DecodeError::InvalidJson));
        assert_eq!(decode::<Point>(&json!("x")), Err(DecodeError::InvalidJson));
    }

    #[test]
    fn test_array_element_failure_leaves_slot_untouched() {
        let mut path = Path {
            name: "old".into(),
            points: vec![Point::default()],
        };
        let err = decode_into(
            &json!({"name": "p", "points": [{"x": 1, "y": 1, "label": null}, {"x": 1}]}),
            &mut path,
        )
        .unwrap_err();
        assert_eq!(err, DecodeError::PartiallyParsed { missing: vec!["y", "label"] });
        assert_eq!(path.points.len(), 1);
    }

    #[test]
    fn test_choice_picks_branch_by_flag() {
        let ok: Choice<Point, Failure> =
            decode_choice(&json!({"success": true, "x": 1, "y": 2, "label": null}), "success").unwrap();
        assert!(matches!(ok, Choice::True(Point { x: 1, y: 2, .. })));

        let failed: Choice<Point, Failure> =
            decode_choice(&json!({"success": false, "error": "nope"}), "success").unwrap();
        assert_eq!(failed, Choice::False(Failure { error: "nope".into() }));
    }

    #[test]
    fn test_choice_without_discriminator_fails_first() {
        let result: Result<Choice<Point, Failure>, _> =
            decode_choice(&json!({"x": 1, "y": 2, "label": null}), "success");
        assert_eq!(
            result,
            Err(DecodeError::PartiallyParsed { missing: vec!["success"] })
        );
    }

    #[derive(Debug, PartialEq)]
    enum Shape {
        Point(Point),
        Path(Path),
    }

    const SHAPES: &[SwitchEntry<Shape>] = &[
        SwitchEntry {
            key: "point",
            decode: |tree| decode(tree).map(Shape::Point),
        },
        SwitchEntry {
            key: "path",
            decode: |tree| decode(tree).map(Shape::Path),
        },
    ];

    #[test]
    fn test_switch_records_matched_ordinal() {
        let switched = decode_switch(&json!({"kind": "path", "name": "p", "points": []}), "kind", SHAPES)
            .unwrap();
        assert_eq!(switched.index, 1);
        assert!(matches!(switched.value, Shape::Path(_)));
    }

    #[test]
    fn test_switch_without_match() {
        let err = decode_switch(&json!({"kind": "circle"}), "kind", SHAPES).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SwitchNotMatched {
                field: "kind",
                value: "circle".into()
            }
        );
    }

    #[test]
    fn test_force_decode_reports_record_name() {
        let err = force_decode::<Failure>(json!({"error": 5})).unwrap_err();
        assert_eq!(err.record, "Failure");
        assert!(matches!(err.source, DecodeError::IncorrectType { field: "error", .. }));
    }
}
