use super::super::domain::ProfileId;
use super::super::period::Period;
use super::super::ranking::RankedProfile;
use super::super::series::ChartSeries;
use super::super::totals::PeriodTotals;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedMetric {
    pub profile_id: ProfileId,
    pub name: String,
    pub value: f64,
}

/// Snapshot handed to coaching prompts and the hub header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadlineStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub total_dates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_player: Option<NamedMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biggest_investment: Option<NamedMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    WhoToSeeNext,
    DatingActivity,
}

impl InsightKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WhoToSeeNext => "Who to See Next",
            Self::DatingActivity => "Dating Activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityInsight {
    pub kind: InsightKind,
    pub title: &'static str,
    pub text: String,
}

impl ActivityInsight {
    pub(crate) fn new(kind: InsightKind, text: String) -> Self {
        Self {
            kind,
            title: kind.label(),
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybookReport {
    pub period: Period,
    pub period_label: &'static str,
    pub generated_at: DateTime<Utc>,
    pub totals: PeriodTotals,
    pub series: ChartSeries,
    pub top_profiles: Vec<RankedProfile>,
    pub profile_count: usize,
    pub headline: HeadlineStats,
    pub insights: Vec<ActivityInsight>,
}
