use super::*;
use crate::event::Priority;

#[test]
fn reaction_entry_keys_by_status_and_sequence() {
    let a = ReactionEntry::new(SessionStatus::CiFailed, 1);
    let b = ReactionEntry::new(SessionStatus::CiFailed, 2);
    assert_ne!(a, b);
    assert_eq!(a.status, "ci_failed");
}

#[test]
fn reaction_kind_serializes_with_kind_tag() {
    let kind = ReactionKind::Notify {
        priority: Priority::Urgent,
    };
    let json = serde_json::to_string(&kind).unwrap();
    assert!(json.contains("\"kind\":\"notify\""));
}

#[test]
fn default_retries_is_two_when_absent() {
    let json = r#"{"auto":true,"action":{"kind":"notify","priority":"info"}}"#;
    let spec: ReactionSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.retries, 2);
    assert_eq!(spec.escalate_after, None);
}
