// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Startup trust-prompt poll interval (default: 300ms).
pub fn prompt_poll_interval() -> Duration {
    parse_duration_ms("FLEET_PROMPT_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(300))
}

/// Startup trust-prompt poll budget, in number of poll attempts (default: 10).
pub fn prompt_poll_max_attempts() -> usize {
    std::env::var("FLEET_PROMPT_POLL_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(10)
}
