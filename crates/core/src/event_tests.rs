use super::*;

fn sample(kind: EventKind) -> Event {
    Event {
        id: 1,
        kind,
        priority: Priority::Info,
        session_id: Some(SessionId::new("proj-1")),
        project_id: Some("proj".to_string()),
        timestamp: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
        message: "test".to_string(),
        data: serde_json::Map::new(),
    }
}

#[test]
fn tagged_enum_round_trips_with_type_field() {
    let event = sample(EventKind::SessionKilled);
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"session.killed\""));
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind_name(), "session.killed");
}

#[test]
fn kind_name_matches_serde_rename() {
    let event = sample(EventKind::ReactionFired {
        status: "ci_failed".to_string(),
        attempt: 1,
    });
    assert_eq!(event.kind_name(), "reaction.fired");
}

#[test]
fn priority_orders_info_below_urgent() {
    assert!(Priority::Info < Priority::Urgent);
    assert!(Priority::Warning < Priority::Action);
}
