//! Decode engine contract tests
//!
//! Exercised through real wire records so the guarantees hold for the
//! tables the client actually ships.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use pongterm_core::decode::{
    decode, decode_choice, decode_owned, decode_switch, Choice, DecodeError, FieldKind, Record,
    SwitchEntry,
};
use pongterm_core::messages::{decode_server_message, ServerMessage, SERVER_MESSAGES};
use pongterm_core::records::{ApiFailure, AuthResponse, FriendList, Tournament, TournamentList};

fn tournament() -> Value {
    json!({
        "id": 4,
        "name": "Winter Open",
        "description": "single elimination",
        "max_players": 8,
        "current_players": 2,
        "status": "pending",
        "bracket_data": {"rounds": [[1, 2]]},
        "winner_id": null,
        "creator_username": "ann",
        "created_at": "2024-01-05T10:00:00Z"
    })
}

fn friends() -> Value {
    json!({
        "success": true,
        "data": [
            {"id": 2, "username": "bob", "display_name": "Bob", "avatar_url": null, "is_online": true},
            {"id": 3, "username": "cy", "display_name": "Cy", "avatar_url": "c.png", "is_online": false}
        ]
    })
}

#[test]
fn every_field_is_populated_from_a_well_formed_tree() {
    let record: Tournament = decode(&tournament()).unwrap();
    assert_eq!(record.id, 4);
    assert_eq!(record.name, "Winter Open");
    assert_eq!(record.description.as_deref(), Some("single elimination"));
    assert_eq!(record.max_players, 8);
    assert_eq!(record.current_players, 2);
    assert_eq!(record.status, "pending");
    assert!(record.bracket_data.is_some());
    assert_eq!(record.winner_id, None);
    assert_eq!(record.creator_username, "ann");
    assert_eq!(record.created_at, "2024-01-05T10:00:00Z");
}

#[test]
fn removing_any_key_is_partially_parsed() {
    for field in Tournament::fields() {
        let mut tree = tournament();
        tree.as_object_mut().unwrap().remove(field.name);
        assert_eq!(
            decode::<Tournament>(&tree),
            Err(DecodeError::PartiallyParsed {
                missing: vec![field.name]
            }),
            "removing `{}`",
            field.name
        );
    }
}

#[test]
fn mistyped_fields_report_the_offending_node() {
    for field in Tournament::fields() {
        let wrong = match field.kind() {
            FieldKind::Str | FieldKind::StrNullable => json!(17),
            FieldKind::Object | FieldKind::ObjectNullable | FieldKind::Array => json!("flat"),
            _ => json!({"nested": true}),
        };
        let mut tree = tournament();
        tree[field.name] = wrong.clone();
        match decode::<Tournament>(&tree) {
            Err(DecodeError::IncorrectType {
                field: name, node, ..
            }) => {
                assert_eq!(name, field.name);
                assert_eq!(node, wrong);
            }
            other => panic!("`{}` decoded as {other:?}", field.name),
        }
    }
}

#[test]
fn null_is_rejected_for_non_nullable_kinds() {
    let mut tree = tournament();
    tree["name"] = Value::Null;
    assert!(matches!(
        decode::<Tournament>(&tree),
        Err(DecodeError::IncorrectType { field: "name", .. })
    ));
}

#[test]
fn release_empties_arrays_and_is_idempotent() {
    let Choice::True(list) = decode_choice::<FriendList, ApiFailure>(&friends(), "success").unwrap()
    else {
        panic!("expected the success branch");
    };
    assert_eq!(list.data.len(), 2);

    let mut owned = decode_owned::<FriendList>(friends()).unwrap();
    assert!(owned.backing().is_some());
    assert!(owned.release());
    assert!(owned.is_released());
    assert!(owned.data.is_empty());
    assert!(owned.data.capacity() == 0);
    assert!(!owned.release());
}

#[test]
fn choice_decodes_only_the_selected_branch() {
    let failure = json!({"success": false, "error": "Invalid credentials"});
    assert_eq!(
        decode_choice::<AuthResponse, ApiFailure>(&failure, "success").unwrap(),
        Choice::False(ApiFailure {
            error: "Invalid credentials".into()
        })
    );

    // A false flag never looks at the success-branch keys
    let sparse = json!({"success": false, "error": "x", "data": 5});
    assert!(decode_choice::<AuthResponse, ApiFailure>(&sparse, "success").is_ok());

    let untagged = json!({"error": "x"});
    assert_eq!(
        decode_choice::<AuthResponse, ApiFailure>(&untagged, "success"),
        Err(DecodeError::PartiallyParsed {
            missing: vec!["success"]
        })
    );
}

#[test]
fn switch_index_is_the_entry_ordinal() {
    for (ordinal, entry) in SERVER_MESSAGES.iter().enumerate() {
        let tree = json!({"type": entry.key});
        match decode_switch(&tree, "type", SERVER_MESSAGES) {
            Ok(switched) => assert_eq!(switched.index, ordinal),
            // Bodies are empty, so only field-shape errors may occur
            Err(err) => assert!(
                matches!(err, DecodeError::PartiallyParsed { .. }),
                "{} -> {err:?}",
                entry.key
            ),
        }
    }

    let start = json!({"type": "friend_pong_start", "gameId": "g1", "role": "left", "opponentId": 9});
    let switched = decode_server_message(&start).unwrap();
    assert_eq!(switched.index, 1);
    assert!(matches!(switched.value, ServerMessage::MatchStart(_)));
}

#[test]
fn switch_without_matching_key() {
    let entries: &[SwitchEntry<Tournament>] = &[SwitchEntry {
        key: "tournament",
        decode: |tree| decode(tree),
    }];
    assert_eq!(
        decode_switch(&json!({"kind": "league"}), "kind", entries),
        Err(DecodeError::SwitchNotMatched {
            field: "kind",
            value: "league".into()
        })
    );
}

#[test]
fn tournament_list_rejects_non_object_elements() {
    let tree = json!({"data": [tournament(), 7]});
    assert_eq!(decode::<TournamentList>(&tree), Err(DecodeError::InvalidJson));
}
