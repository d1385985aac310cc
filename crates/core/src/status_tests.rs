use super::*;
use yare::parameterized;

#[parameterized(
    merged = { SessionStatus::Merged, true },
    done = { SessionStatus::Done, true },
    killed = { SessionStatus::Killed, true },
    cleanup = { SessionStatus::Cleanup, true },
    terminated = { SessionStatus::Terminated, true },
    errored = { SessionStatus::Errored, true },
    working = { SessionStatus::Working, false },
    stuck = { SessionStatus::Stuck, false },
    pr_open = { SessionStatus::PrOpen, false },
)]
fn is_terminal_matches_table(status: SessionStatus, expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[parameterized(
    killed = { SessionStatus::Killed, false },
    cleanup = { SessionStatus::Cleanup, false },
    errored = { SessionStatus::Errored, true },
    merged = { SessionStatus::Merged, true },
    done = { SessionStatus::Done, true },
)]
fn is_restorable_excludes_killed_and_cleanup(status: SessionStatus, expected: bool) {
    assert_eq!(status.is_restorable(), expected);
}

#[test]
fn display_uses_snake_case() {
    assert_eq!(SessionStatus::NeedsInput.to_string(), "needs_input");
    assert_eq!(Activity::WaitingInput.to_string(), "waiting_input");
}
