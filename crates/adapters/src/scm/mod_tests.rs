// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn scm_error_messages_are_descriptive() {
    let err = ScmError::Transient("429".into());
    assert!(err.to_string().contains("429"));
}

#[test]
fn no_pr_found_has_a_stable_message() {
    assert_eq!(ScmError::NoPrFound.to_string(), "no pull request found");
}
