//! Rating and spend aggregation over a user's roster of profiles.
//!
//! The calculators (`rating`, `spend`, `ranking`, `series`, `totals`) are pure
//! functions over slices of records. `service` and `router` put a record store
//! and the validation guard in front of them.

pub mod domain;
pub mod guard;
pub mod period;
pub mod ranking;
pub mod rating;
pub mod report;
pub mod roster;
pub mod router;
pub mod series;
pub mod service;
pub mod spend;
pub mod store;
pub mod totals;
pub mod upcoming;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    Base, Meeting, MeetingDraft, MeetingId, Profile, ProfileDraft, ProfileId, ProfileStatus,
    RecordSet, UpcomingDate, UpcomingDateDraft, UpcomingDateId, EXPENSE_KIND, MAX_RATING,
};
pub use guard::{RecordGuard, RecordViolation};
pub use period::{buckets, rolling_window_start, Bucket, OutcomeRule, Period, WeekStart};
pub use ranking::{rank_profiles, top_profiles, RankedProfile, RankingOptions, DEFAULT_TOP_N};
pub use rating::{composite_rating, round1, RatingBreakdown};
pub use report::{
    build_report, ActivityInsight, HeadlineStats, InsightKind, NamedMetric, PlaybookReport,
    ReportOptions,
};
pub use roster::{
    player_detail, roster_view, PlayerDetail, RosterCard, RosterQuery, RosterSort, RosterView,
};
pub use router::playbook_router;
pub use series::{spend_series, ChartSeries, SeriesOptions};
pub use service::{PlaybookService, PlaybookServiceError};
pub use spend::{cost_per_outcome, CostPerOutcome, SpendSummary};
pub use store::{RecordStore, StoreError};
pub use totals::{period_totals, PeriodTotals};
pub use upcoming::{upcoming_dates, UpcomingEntry};
