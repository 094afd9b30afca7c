use super::domain::Meeting;
use super::period::{buckets, OutcomeRule, Period, WeekStart};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesOptions {
    pub week_start: WeekStart,
    pub outcome_rule: OutcomeRule,
}

/// Chart-ready cost-per-outcome series; `labels` and `values` are parallel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub period: Period,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, i64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Per-bucket cost-per-outcome across every profile's meetings.
///
/// Buckets without outcomes read as zero rather than a gap so the chart line
/// stays continuous.
pub fn spend_series(
    meetings: &[Meeting],
    period: Period,
    now: DateTime<Utc>,
    options: SeriesOptions,
) -> ChartSeries {
    let windows = buckets(period, now, options.week_start);
    let mut labels = Vec::with_capacity(windows.len());
    let mut values = Vec::with_capacity(windows.len());

    for bucket in windows {
        let (spent, outcomes) = meetings
            .iter()
            .filter(|meeting| bucket.contains(meeting.date))
            .fold((0.0, 0usize), |(spent, outcomes), meeting| {
                let outcomes = if options.outcome_rule.counts(meeting) {
                    outcomes + 1
                } else {
                    outcomes
                };
                (spent + meeting.spend(), outcomes)
            });

        let value = if outcomes > 0 {
            (spent / outcomes as f64).round() as i64
        } else {
            0
        };

        labels.push(bucket.label);
        values.push(value);
    }

    ChartSeries {
        period,
        labels,
        values,
    }
}
