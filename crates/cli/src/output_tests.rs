// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::format_time_ago;

#[test]
fn format_time_ago_zero_is_dash() {
    assert_eq!(format_time_ago(0), "-");
}

#[test]
fn format_time_ago_seconds() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let result = format_time_ago(now_ms - 5_000);
    assert!(result.ends_with('s'), "expected seconds suffix, got {result}");
}

#[test]
fn format_time_ago_minutes() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let result = format_time_ago(now_ms - 120_000);
    assert!(result.ends_with('m'), "expected minutes suffix, got {result}");
}

#[test]
fn format_time_ago_hours() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let result = format_time_ago(now_ms - 7_200_000);
    assert!(result.ends_with('h'), "expected hours suffix, got {result}");
}

#[test]
fn format_time_ago_days() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let result = format_time_ago(now_ms - 172_800_000);
    assert!(result.ends_with('d'), "expected days suffix, got {result}");
}
