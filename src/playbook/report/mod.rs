mod insights;
pub mod views;

use super::domain::{ProfileId, RecordSet};
use super::period::{OutcomeRule, Period, WeekStart};
use super::ranking::{rank_profiles, RankedProfile, DEFAULT_TOP_N};
use super::rating::round1;
use super::series::{spend_series, SeriesOptions};
use super::totals::period_totals;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub(crate) use insights::generate_insights;
pub use views::{ActivityInsight, HeadlineStats, InsightKind, NamedMetric, PlaybookReport};

/// Knobs shared by every report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub week_start: WeekStart,
    pub outcome_rule: OutcomeRule,
    pub exclude_benched: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            week_start: WeekStart::default(),
            outcome_rule: OutcomeRule::default(),
            exclude_benched: false,
        }
    }
}

impl ReportOptions {
    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            week_start: self.week_start,
            outcome_rule: self.outcome_rule,
        }
    }
}

pub fn build_report(
    records: &RecordSet,
    period: Period,
    now: DateTime<Utc>,
    options: &ReportOptions,
) -> PlaybookReport {
    let ranked = rank_profiles(
        &records.profiles,
        &records.meetings,
        options.exclude_benched,
    );
    let headline = headline_stats(records, &ranked);
    let top_profiles = ranked.into_iter().take(options.top_n).collect();

    PlaybookReport {
        period,
        period_label: period.label(),
        generated_at: now,
        totals: period_totals(&records.meetings, period, now, options.outcome_rule),
        series: spend_series(&records.meetings, period, now, options.series_options()),
        top_profiles,
        profile_count: records.profiles.len(),
        headline,
        insights: generate_insights(&records.profiles, &records.meetings, now),
    }
}

fn headline_stats(records: &RecordSet, ranked: &[RankedProfile]) -> HeadlineStats {
    let average_rating = if ranked.is_empty() {
        None
    } else {
        let sum: f64 = ranked.iter().map(|entry| entry.rating).sum();
        Some(round1(sum / ranked.len() as f64))
    };

    let best_player = ranked.first().map(|entry| NamedMetric {
        profile_id: entry.profile.id.clone(),
        name: entry.profile.name.clone(),
        value: entry.rating,
    });

    let mut lifetime_spend: HashMap<&ProfileId, f64> = HashMap::new();
    for meeting in &records.meetings {
        *lifetime_spend.entry(&meeting.profile_id).or_default() += meeting.spend();
    }

    let mut biggest_investment: Option<NamedMetric> = None;
    for profile in &records.profiles {
        let spent = lifetime_spend.get(&profile.id).copied().unwrap_or(0.0);
        let current = biggest_investment.as_ref().map_or(0.0, |metric| metric.value);
        if spent > current {
            biggest_investment = Some(NamedMetric {
                profile_id: profile.id.clone(),
                name: profile.name.clone(),
                value: spent,
            });
        }
    }

    HeadlineStats {
        average_rating,
        total_dates: records.meetings.len(),
        best_player,
        biggest_investment,
    }
}
