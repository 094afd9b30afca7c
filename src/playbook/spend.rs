use super::domain::Meeting;
use serde::{Serialize, Serializer};
use std::fmt;

/// Spend efficiency relative to home-run outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostPerOutcome {
    NotApplicable,
    Amount(f64),
}

impl CostPerOutcome {
    pub const NOT_APPLICABLE_LABEL: &'static str = "N/A";

    pub fn from_totals(total_spent: f64, outcome_count: usize) -> Self {
        if outcome_count == 0 {
            Self::NotApplicable
        } else {
            Self::Amount(total_spent / outcome_count as f64)
        }
    }

    /// Full-precision value, for callers that keep computing with it.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::NotApplicable => None,
            Self::Amount(amount) => Some(amount),
        }
    }

    /// Nearest whole currency unit, as shown to users.
    pub fn rounded(self) -> Option<i64> {
        self.value().map(|amount| amount.round() as i64)
    }
}

impl fmt::Display for CostPerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded() {
            Some(amount) => write!(f, "${amount}"),
            None => f.write_str(Self::NOT_APPLICABLE_LABEL),
        }
    }
}

impl Serialize for CostPerOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotApplicable => serializer.serialize_str(Self::NOT_APPLICABLE_LABEL),
            Self::Amount(amount) => serializer.serialize_f64(*amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpendSummary {
    pub total_spent: f64,
    pub outcome_count: usize,
    pub cpn: CostPerOutcome,
}

/// Total spend (expenses included) over home-run count.
///
/// No date filtering happens here; pass a pre-windowed slice to get a
/// period figure.
pub fn cost_per_outcome<'a, I>(meetings: I) -> SpendSummary
where
    I: IntoIterator<Item = &'a Meeting>,
{
    let (total_spent, outcome_count) =
        meetings
            .into_iter()
            .fold((0.0, 0usize), |(spent, outcomes), meeting| {
                let outcomes = if meeting.is_home_run() {
                    outcomes + 1
                } else {
                    outcomes
                };
                (spent + meeting.spend(), outcomes)
            });

    SpendSummary {
        total_spent,
        outcome_count,
        cpn: CostPerOutcome::from_totals(total_spent, outcome_count),
    }
}
