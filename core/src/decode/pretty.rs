//! Debug pretty-printer for decoded records
//!
//! Output is one `name = value` line per field, indented with one tab per
//! nesting level:
//!
//! ```text
//! token = "abc"
//! user = {
//! 	id = 4
//! 	avatar_url = (null)
//! }
//! ```

use std::fmt::{self, Write};

use super::descriptor::{Record, Slot};

/// `Display` adapter: `tracing::debug!("{}", Pretty(&record))`
pub struct Pretty<'a, R>(pub &'a R);

impl<R: Record> fmt::Display for Pretty<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        pretty_record(self.0, f, 0)
    }
}

fn indent(out: &mut dyn Write, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_char('\t')?;
    }
    Ok(())
}

fn optional<T: fmt::Display>(out: &mut dyn Write, value: Option<T>) -> fmt::Result {
    match value {
        Some(value) => writeln!(out, "{value}"),
        None => writeln!(out, "(null)"),
    }
}

/// Print every field of `record` at `level`
pub fn pretty_record<R: Record>(record: &R, out: &mut dyn Write, level: usize) -> fmt::Result {
    for field in R::fields() {
        indent(out, level)?;
        write!(out, "{} = ", field.name)?;
        match &field.slot {
            Slot::Bool(lens) => writeln!(out, "{}", (lens.get)(record))?,
            Slot::BoolNullable(lens) => optional(out, *(lens.get)(record))?,
            Slot::Int(lens) => writeln!(out, "{}", (lens.get)(record))?,
            Slot::IntNullable(lens) => optional(out, *(lens.get)(record))?,
            Slot::Double(lens) => writeln!(out, "{}", (lens.get)(record))?,
            Slot::DoubleNullable(lens) => optional(out, *(lens.get)(record))?,
            Slot::Str(lens) => writeln!(out, "{:?}", (lens.get)(record))?,
            Slot::StrNullable(lens) => {
                optional(out, (lens.get)(record).as_ref().map(|text| format!("{text:?}")))?;
            }
            Slot::Object(nested) | Slot::ObjectNullable(nested) | Slot::Array(nested) => {
                (nested.pretty)(record, out, level)?;
            }
        }
    }
    Ok(())
}

/// Print a nested record as a braced block (after `name = `)
pub fn pretty_object<N: Record>(record: &N, out: &mut dyn Write, level: usize) -> fmt::Result {
    writeln!(out, "{{")?;
    pretty_record(record, out, level + 1)?;
    indent(out, level)?;
    writeln!(out, "}}")
}

pub fn pretty_nullable<N: Record>(slot: &Option<N>, out: &mut dyn Write, level: usize) -> fmt::Result {
    match slot {
        Some(record) => pretty_object(record, out, level),
        None => writeln!(out, "(null)"),
    }
}

pub fn pretty_array<N: Record>(items: &[N], out: &mut dyn Write, level: usize) -> fmt::Result {
    if items.is_empty() {
        return writeln!(out, "[]");
    }
    writeln!(out, "[")?;
    for item in items {
        indent(out, level + 1)?;
        pretty_object(item, out, level + 1)?;
    }
    indent(out, level)?;
    writeln!(out, "]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    crate::record! {
        struct Owner {
            name: Str,
            avatar: StrNullable,
        }
    }

    crate::record! {
        struct Team {
            id: Int,
            active: Bool,
            owner: Object<Owner>,
            backup: ObjectNullable<Owner>,
            members: Array<Owner>,
        }
    }

    #[test]
    fn test_pretty_layout() {
        let team = Team {
            id: 3,
            active: true,
            owner: Owner {
                name: "ann".into(),
                avatar: None,
            },
            backup: None,
            members: vec![Owner {
                name: "bo".into(),
                avatar: Some("b.png".into()),
            }],
        };
        let expected = "id = 3\n\
active = true\n\
owner = {\n\
\tname = \"ann\"\n\
\tavatar = (null)\n\
}\n\
backup = (null)\n\
members = [\n\
\t{\n\
\t\tname = \"bo\"\n\
\t\tavatar = \"b.png\"\n\
\t}\n\
]\n";
        assert_eq!(Pretty(&team).to_string(), expected);
    }

    #[test]
    fn test_empty_array() {
        let team = Team::default();
        assert!(Pretty(&team).to_string().contains("members = []\n"));
    }
}
