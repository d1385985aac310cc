// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status decision table, as a pure function of one tick's observation.

use fleet_core::{Activity, CiSummary, PrSnapshot, PrState, ReviewDecision, SessionStatus};
use std::time::Duration;

/// One tick's worth of inputs, already degraded to last-known-good by the
/// caller if an SCM call failed this tick.
pub struct Observation {
    pub pr: Option<PrSnapshot>,
    pub activity: Activity,
    pub runtime_alive: bool,
    /// How long `activity` has continuously been `Idle`, if it has been.
    pub idle_elapsed: Option<Duration>,
}

/// Evaluate the priority-ordered decision table against `observation`.
/// `previous` never changes the outcome; it is accepted so callers can log
/// "no-op" ticks without a second lookup, and to keep the signature stable
/// if a future priority needs hysteresis.
pub fn derive_status(
    observation: &Observation,
    _previous: SessionStatus,
    stuck_after: Duration,
) -> SessionStatus {
    if let Some(pr) = &observation.pr {
        if pr.state == PrState::Merged {
            return SessionStatus::Merged;
        }
    }

    let has_open_pr = matches!(&observation.pr, Some(pr) if pr.state == PrState::Open);
    if !observation.runtime_alive && !has_open_pr {
        return SessionStatus::Done;
    }

    if let Some(pr) = &observation.pr {
        if pr.state == PrState::Open && pr.mergeability.mergeable {
            return SessionStatus::Mergeable;
        }
        if pr.ci_summary == CiSummary::Failing {
            return SessionStatus::CiFailed;
        }
        if pr.review_decision == ReviewDecision::ChangesRequested {
            return SessionStatus::ChangesRequested;
        }
        if pr.review_decision == ReviewDecision::Approved && pr.ci_summary != CiSummary::Failing {
            return SessionStatus::Approved;
        }
        if pr.state == PrState::Open && pr.review_decision == ReviewDecision::Pending {
            return SessionStatus::ReviewPending;
        }
        if pr.state == PrState::Open {
            return SessionStatus::PrOpen;
        }
    }

    if observation.activity == Activity::WaitingInput {
        return SessionStatus::NeedsInput;
    }
    let idle_too_long = observation
        .idle_elapsed
        .is_some_and(|elapsed| elapsed > stuck_after);
    if observation.activity == Activity::Blocked
        || (observation.activity == Activity::Idle && idle_too_long)
    {
        return SessionStatus::Stuck;
    }

    SessionStatus::Working
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
