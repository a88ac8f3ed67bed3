//! `record!`: declare a wire record and its descriptor table in one place.

/// Declare a record struct together with its [`Record`](crate::decode::Record)
/// descriptor table and [`Release`](crate::decode::Release) impl.
///
/// ```
/// pongterm_core::record! {
///     /// A player as the lobby reports it
///     pub struct Player {
///         pub id: Int,
///         pub display_name as "displayName": Str,
///         pub avatar: StrNullable,
///     }
/// }
///
/// let player: Player = pongterm_core::decode::decode(&serde_json::json!({
///     "id": 7, "displayName": "Ann", "avatar": null
/// })).unwrap();
/// assert_eq!(player.display_name, "Ann");
/// ```
///
/// Field kinds: `Bool`, `BoolNullable`, `Int`, `IntNullable`, `Double`,
/// `DoubleNullable`, `Str`, `StrNullable`, `Object<T>`, `ObjectNullable<T>`
/// and `Array<T>`, where `T` is another `record!` type.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident $(as $wire:literal)? : $kind:ident $(<$nested:ty>)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $crate::__record_type!($kind $(<$nested>)?),
            )*
        }

        impl $crate::decode::Record for $name {
            const NAME: &'static str = stringify!($name);

            fn fields() -> &'static [$crate::decode::Field<Self>] {
                static FIELDS: &[$crate::decode::Field<$name>] = &[
                    $(
                        $crate::decode::Field {
                            name: $crate::__record_wire_name!($field $(, $wire)?),
                            slot: $crate::__record_slot!($name, $field, $kind $(<$nested>)?),
                        },
                    )*
                ];
                FIELDS
            }
        }

        impl $crate::decode::Release for $name {
            fn release(&mut self) {
                $crate::decode::release_record(self);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_type {
    (Bool) => { bool };
    (BoolNullable) => { ::core::option::Option<bool> };
    (Int) => { i64 };
    (IntNullable) => { ::core::option::Option<i64> };
    (Double) => { f64 };
    (DoubleNullable) => { ::core::option::Option<f64> };
    (Str) => { ::std::string::String };
    (StrNullable) => { ::core::option::Option<::std::string::String> };
    (Object<$nested:ty>) => { $nested };
    (ObjectNullable<$nested:ty>) => { ::core::option::Option<$nested> };
    (Array<$nested:ty>) => { ::std::vec::Vec<$nested> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_wire_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $wire:literal) => {
        $wire
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_lens {
    ($record:ident, $field:ident, $ty:ty) => {
        $crate::decode::Lens {
            get: {
                fn get(record: &$record) -> &$ty {
                    &record.$field
                }
                get
            },
            get_mut: {
                fn get_mut(record: &mut $record) -> &mut $ty {
                    &mut record.$field
                }
                get_mut
            },
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_nested {
    ($record:ident, $field:ident, $decode:ident, $release:ident, $pretty:ident) => {
        $crate::decode::Nested {
            decode: {
                fn decode(
                    node: &$crate::decode::Value,
                    record: &mut $record,
                ) -> ::core::result::Result<(), $crate::decode::DecodeError> {
                    $crate::decode::$decode(node, &mut record.$field)
                }
                decode
            },
            release: {
                fn release(record: &mut $record) {
                    $crate::decode::$release(&mut record.$field)
                }
                release
            },
            pretty: {
                fn pretty(
                    record: &$record,
                    out: &mut dyn ::core::fmt::Write,
                    level: usize,
                ) -> ::core::fmt::Result {
                    $crate::decode::$pretty(&record.$field, out, level)
                }
                pretty
            },
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_slot {
    ($record:ident, $field:ident, Bool) => {
        $crate::decode::Slot::Bool($crate::__record_lens!($record, $field, bool))
    };
    ($record:ident, $field:ident, BoolNullable) => {
        $crate::decode::Slot::BoolNullable($crate::__record_lens!(
            $record,
            $field,
            ::core::option::Option<bool>
        ))
    };
    ($record:ident, $field:ident, Int) => {
        $crate::decode::Slot::Int($crate::__record_lens!($record, $field, i64))
    };
    ($record:ident, $field:ident, IntNullable) => {
        $crate::decode::Slot::IntNullable($crate::__record_lens!(
            $record,
            $field,
            ::core::option::Option<i64>
        ))
    };
    ($record:ident, $field:ident, Double) => {
        $crate::decode::Slot::Double($crate::__record_lens!($record, $field, f64))
    };
    ($record:ident, $field:ident, DoubleNullable) => {
        $crate::decode::Slot::DoubleNullable($crate::__record_lens!(
            $record,
            $field,
            ::core::option::Option<f64>
        ))
    };
    ($record:ident, $field:ident, Str) => {
        $crate::decode::Slot::Str($crate::__record_lens!($record, $field, ::std::string::String))
    };
    ($record:ident, $field:ident, StrNullable) => {
        $crate::decode::Slot::StrNullable($crate::__record_lens!(
            $record,
            $field,
            ::core::option::Option<::std::string::String>
        ))
    };
    ($record:ident, $field:ident, Object<$nested:ty>) => {
        $crate::decode::Slot::Object($crate::__record_nested!(
            $record,
            $field,
            decode_into,
            release_record,
            pretty_object
        ))
    };
    ($record:ident, $field:ident, ObjectNullable<$nested:ty>) => {
        $crate::decode::Slot::ObjectNullable($crate::__record_nested!(
            $record,
            $field,
            decode_nullable_into,
            release_nullable,
            pretty_nullable
        ))
    };
    ($record:ident, $field:ident, Array<$nested:ty>) => {
        $crate::decode::Slot::Array($crate::__record_nested!(
            $record,
            $field,
            decode_array_into,
            release_array,
            pretty_array
        ))
    };
}
