// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn launch_request_is_plain_data() {
    let req = LaunchRequest {
        session_id: "proj-1".into(),
        permissions: "default".into(),
        model: None,
        prompt: "do work".into(),
    };
    assert_eq!(req.session_id, "proj-1");
}
