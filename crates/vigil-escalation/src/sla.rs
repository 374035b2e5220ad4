//! # SLA Tracking
//!
//! One timer per escalation level reached on a case. A timer starts
//! `Pending` when the case is escalated and closes `Met` or `Breached`
//! when the escalation resolves — `Met` only if resolution happened
//! within the target window, so a late resolution cannot launder a
//! breach. Breach *detection* is a pure scan ([`SlaTracking::is_breached_at`]);
//! reacting to a breach is the caller's job.

use serde::{Deserialize, Serialize};

use vigil_core::{CaseId, SlaId, Timestamp};

use crate::rule::EscalationLevel;

/// What obligation the timer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaType {
    /// Time to first response after escalation.
    Response,
    /// Time to resolve the escalation.
    Resolution,
}

/// The lifecycle state of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    /// Still running.
    Pending,
    /// Closed within the target window.
    Met,
    /// Closed late, or detected past target while running.
    Breached,
}

impl SlaStatus {
    /// Whether the timer has been closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Met | Self::Breached)
    }
}

/// One SLA timer on a case. A case carries several concurrent timers —
/// one per escalation level reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaTracking {
    /// Unique timer identifier.
    pub id: SlaId,
    /// The case the timer belongs to.
    pub case_id: CaseId,
    /// The escalation level the timer was started for.
    pub escalation_level: EscalationLevel,
    /// The tracked obligation.
    pub sla_type: SlaType,
    /// The target window in hours.
    pub target_hours: u32,
    /// When the timer started.
    pub start_time: Timestamp,
    /// When the timer closed, if it has.
    pub end_time: Option<Timestamp>,
    /// Current state.
    pub status: SlaStatus,
}

impl SlaTracking {
    /// Start a new pending timer.
    pub fn started(
        case_id: CaseId,
        escalation_level: EscalationLevel,
        sla_type: SlaType,
        target_hours: u32,
        start_time: Timestamp,
    ) -> Self {
        Self {
            id: SlaId::new(),
            case_id,
            escalation_level,
            sla_type,
            target_hours,
            start_time,
            end_time: None,
            status: SlaStatus::Pending,
        }
    }

    /// Whole hours the timer has been running as of `now` (or ran, if
    /// closed — measured to `end_time`).
    pub fn elapsed_hours(&self, now: Timestamp) -> i64 {
        self.end_time.unwrap_or(now).hours_since(self.start_time)
    }

    /// Whether a still-pending timer has exceeded its target as of `now`.
    /// Pure — detection never mutates the timer.
    pub fn is_breached_at(&self, now: Timestamp) -> bool {
        self.status == SlaStatus::Pending
            && self.elapsed_hours(now) > i64::from(self.target_hours)
    }

    /// Close the timer at `at`: `Met` when within target, `Breached`
    /// otherwise. No-op on an already-closed timer.
    pub fn close(&mut self, at: Timestamp) {
        if self.status.is_terminal() {
            return;
        }
        self.end_time = Some(at);
        self.status = if at.hours_since(self.start_time) <= i64::from(self.target_hours) {
            SlaStatus::Met
        } else {
            SlaStatus::Breached
        };
    }
}

/// A detected breach, reported by the scan without mutating the timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaBreach {
    /// The breached timer.
    pub sla_id: SlaId,
    /// The case it belongs to.
    pub case_id: CaseId,
    /// The escalation level of the timer.
    pub escalation_level: EscalationLevel,
    /// The target window that was exceeded.
    pub target_hours: u32,
    /// Hours elapsed at detection time.
    pub elapsed_hours: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn timer(target_hours: u32) -> SlaTracking {
        SlaTracking::started(
            CaseId::new(),
            EscalationLevel::new(2).unwrap(),
            SlaType::Resolution,
            target_hours,
            ts("2026-03-01T00:00:00Z"),
        )
    }

    #[test]
    fn new_timer_is_pending() {
        let sla = timer(24);
        assert_eq!(sla.status, SlaStatus::Pending);
        assert!(sla.end_time.is_none());
    }

    #[test]
    fn breach_detection_is_strict_past_target() {
        let sla = timer(24);
        assert!(!sla.is_breached_at(ts("2026-03-01T23:00:00Z")));
        // Exactly at target: not yet breached.
        assert!(!sla.is_breached_at(ts("2026-03-02T00:00:00Z")));
        assert!(sla.is_breached_at(ts("2026-03-02T01:00:00Z")));
    }

    #[test]
    fn detection_does_not_mutate() {
        let sla = timer(24);
        let _ = sla.is_breached_at(ts("2026-03-05T00:00:00Z"));
        assert_eq!(sla.status, SlaStatus::Pending);
    }

    #[test]
    fn close_within_target_is_met() {
        let mut sla = timer(24);
        sla.close(ts("2026-03-01T20:00:00Z"));
        assert_eq!(sla.status, SlaStatus::Met);
        assert_eq!(sla.end_time, Some(ts("2026-03-01T20:00:00Z")));
    }

    #[test]
    fn close_past_target_is_breached() {
        let mut sla = timer(24);
        sla.close(ts("2026-03-03T00:00:00Z"));
        assert_eq!(sla.status, SlaStatus::Breached);
    }

    #[test]
    fn close_is_idempotent() {
        let mut sla = timer(24);
        sla.close(ts("2026-03-01T20:00:00Z"));
        sla.close(ts("2026-03-09T00:00:00Z"));
        assert_eq!(sla.status, SlaStatus::Met);
        assert_eq!(sla.end_time, Some(ts("2026-03-01T20:00:00Z")));
    }

    #[test]
    fn elapsed_hours_freezes_after_close() {
        let mut sla = timer(24);
        sla.close(ts("2026-03-01T10:00:00Z"));
        assert_eq!(sla.elapsed_hours(ts("2026-03-09T00:00:00Z")), 10);
    }
}
