//! Deadline windows and day arithmetic.
//!
//! Deadlines are compared in whole calendar days: the difference between the
//! deadline and `now` is rounded up to days. A deadline is overdue once that
//! count is negative and due soon while it is below the warning window, so
//! the whole due day itself still counts as "due today".

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Windows used when deriving workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlinePolicy {
    /// Warn this many days before the direction deadline
    pub direction_due_soon_days: i64,
    /// First draft is due this many days after direction is submitted
    pub first_draft_window_days: i64,
    /// Warn this many days before the first draft deadline
    pub draft_due_soon_days: i64,
    /// Feedback cycles allowed per content item
    pub max_feedback_cycles: usize,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            direction_due_soon_days: 2,
            first_draft_window_days: 3,
            draft_due_soon_days: 1,
            max_feedback_cycles: 3,
        }
    }
}

impl DeadlinePolicy {
    pub fn first_draft_deadline(&self, direction_created_at: DateTime<Utc>) -> DateTime<Utc> {
        direction_created_at + Duration::days(self.first_draft_window_days)
    }
}

/// Where `now` sits relative to a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Pending,
    DueSoon,
    Overdue,
}

pub fn urgency(deadline: DateTime<Utc>, now: DateTime<Utc>, window_days: i64) -> Urgency {
    let days = days_until(deadline, now);
    if days < 0 {
        Urgency::Overdue
    } else if days < window_days {
        Urgency::DueSoon
    } else {
        Urgency::Pending
    }
}

/// Whole days from `now` until `deadline`, rounded up. Negative once past.
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Deadline state shown alongside a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeadlineState {
    OnTrack { days_left: i64 },
    DueSoon { days_left: i64 },
    Overdue { days_overdue: i64 },
}

impl DeadlineState {
    pub fn evaluate(deadline: DateTime<Utc>, now: DateTime<Utc>, window_days: i64) -> Self {
        let days = days_until(deadline, now);
        match urgency(deadline, now, window_days) {
            Urgency::Pending => DeadlineState::OnTrack { days_left: days },
            Urgency::DueSoon => DeadlineState::DueSoon { days_left: days },
            Urgency::Overdue => DeadlineState::Overdue { days_overdue: -days },
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DeadlineState::Overdue { .. })
    }
}
