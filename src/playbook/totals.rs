use super::domain::Meeting;
use super::period::{rolling_window_start, OutcomeRule, Period};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Headline numbers for the selected period's rolling window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub period: Period,
    pub window_start: DateTime<Utc>,
    pub total_spent: f64,
    /// Every record in the window, expense entries included.
    pub total_dates: usize,
    pub total_hookups: usize,
}

pub fn period_totals(
    meetings: &[Meeting],
    period: Period,
    now: DateTime<Utc>,
    outcome_rule: OutcomeRule,
) -> PeriodTotals {
    let window_start = rolling_window_start(period, now);
    let mut totals = PeriodTotals {
        period,
        window_start,
        total_spent: 0.0,
        total_dates: 0,
        total_hookups: 0,
    };

    for meeting in meetings.iter().filter(|m| m.date >= window_start) {
        totals.total_spent += meeting.spend();
        totals.total_dates += 1;
        if outcome_rule.counts(meeting) {
            totals.total_hookups += 1;
        }
    }

    totals
}
