use super::*;

#[test]
fn clean_mergeability_has_no_blockers() {
    let m = Mergeability::clean(true);
    assert!(m.mergeable);
    assert!(m.blockers.is_empty());
}

#[test]
fn pr_snapshot_round_trips_through_json() {
    let snap = PrSnapshot {
        handle: PrHandle {
            number: 42,
            url: "https://example.invalid/pr/42".to_string(),
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            branch: "feat/x".to_string(),
            base_branch: "main".to_string(),
            is_draft: false,
            title: "Add widget".to_string(),
        },
        state: PrState::Open,
        ci_summary: CiSummary::Failing,
        review_decision: ReviewDecision::Pending,
        mergeability: Mergeability::clean(false),
        unresolved_threads: 2,
        unresolved_comments: vec![UnresolvedComment {
            path: "src/lib.rs".to_string(),
            line: 10,
            author: "reviewer".to_string(),
            body: "nit".to_string(),
            url: "https://example.invalid/pr/42#c1".to_string(),
        }],
    };
    let json = serde_json::to_string(&snap).unwrap();
    let back: PrSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.handle.number, 42);
    assert_eq!(back.unresolved_comments.len(), 1);
}
