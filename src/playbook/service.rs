use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{
    Meeting, MeetingDraft, MeetingId, Profile, ProfileDraft, ProfileId, RecordSet, UpcomingDate,
    UpcomingDateDraft, UpcomingDateId,
};
use super::guard::{RecordGuard, RecordViolation};
use super::period::Period;
use super::report::{build_report, PlaybookReport, ReportOptions};
use super::roster::{player_detail, roster_view, PlayerDetail, RosterQuery, RosterView};
use super::store::{RecordStore, StoreError};
use super::upcoming::{upcoming_dates, UpcomingEntry};

/// Service composing the record guard, the store, and the aggregation engine.
pub struct PlaybookService<S> {
    guard: Arc<RecordGuard>,
    store: Arc<S>,
    options: ReportOptions,
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MEETING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static UPCOMING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("pro-{id:06}"))
}

fn next_meeting_id() -> MeetingId {
    let id = MEETING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MeetingId(format!("mtg-{id:06}"))
}

fn next_upcoming_id() -> UpcomingDateId {
    let id = UPCOMING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UpcomingDateId(format!("upd-{id:06}"))
}

impl<S> PlaybookService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, options: ReportOptions) -> Self {
        Self {
            guard: Arc::new(RecordGuard),
            store,
            options,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn add_profile(
        &self,
        draft: ProfileDraft,
        now: DateTime<Utc>,
    ) -> Result<Profile, PlaybookServiceError> {
        let profile = self
            .guard
            .profile_from_draft(draft, next_profile_id(), now)?;
        let stored = self.store.insert_profile(profile)?;
        info!(profile_id = %stored.id, status = stored.status.label(), "profile added");
        Ok(stored)
    }

    pub fn add_meeting(
        &self,
        profile_id: &ProfileId,
        draft: MeetingDraft,
        now: DateTime<Utc>,
    ) -> Result<Meeting, PlaybookServiceError> {
        let profile = self.store.fetch_profile(profile_id)?;
        let meeting = self.guard.meeting_from_draft(
            profile_id,
            profile.as_ref(),
            draft,
            next_meeting_id(),
            now,
        )?;
        let stored = self.store.insert_meeting(meeting)?;
        info!(
            profile_id = %stored.profile_id,
            kind = %stored.kind,
            amount = stored.spend(),
            "meeting recorded"
        );
        Ok(stored)
    }

    pub fn schedule(&self, draft: UpcomingDateDraft) -> Result<UpcomingDate, PlaybookServiceError> {
        let profile = self.store.fetch_profile(&draft.profile_id)?;
        let date = self
            .guard
            .upcoming_from_draft(profile.as_ref(), draft, next_upcoming_id())?;
        let stored = self.store.insert_upcoming(date)?;
        info!(profile_id = %stored.profile_id, date = %stored.date, "date scheduled");
        Ok(stored)
    }

    pub fn player(
        &self,
        profile_id: &ProfileId,
        now: DateTime<Utc>,
    ) -> Result<PlayerDetail, PlaybookServiceError> {
        let profile = self
            .store
            .fetch_profile(profile_id)?
            .ok_or(StoreError::NotFound)?;
        let meetings = self.store.meetings_for(profile_id)?;
        let upcoming = self.store.upcoming_dates()?;
        Ok(player_detail(&profile, &meetings, &upcoming, now))
    }

    pub fn roster(&self, query: &RosterQuery) -> Result<RosterView, PlaybookServiceError> {
        let profiles = self.store.profiles()?;
        let meetings = self.store.meetings()?;
        Ok(roster_view(&profiles, &meetings, query))
    }

    pub fn upcoming(
        &self,
        now: DateTime<Utc>,
        profile_id: Option<&ProfileId>,
    ) -> Result<Vec<UpcomingEntry>, PlaybookServiceError> {
        let profiles = self.store.profiles()?;
        let dates = self.store.upcoming_dates()?;
        Ok(upcoming_dates(&dates, &profiles, now, profile_id))
    }

    /// Build the playbook report over everything in the store. `top` overrides
    /// the configured leaderboard size for this call.
    pub fn report(
        &self,
        period: Period,
        now: DateTime<Utc>,
        top: Option<usize>,
    ) -> Result<PlaybookReport, PlaybookServiceError> {
        let records = self.store.snapshot()?;
        let mut options = self.options;
        if let Some(top) = top {
            options.top_n = top;
        }

        let report = build_report(&records, period, now, &options);
        debug!(
            period = period.label(),
            profiles = report.profile_count,
            ranked = report.top_profiles.len(),
            "playbook report generated"
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> Result<RecordSet, PlaybookServiceError> {
        Ok(self.store.snapshot()?)
    }
}

/// Error raised by the playbook service.
#[derive(Debug, thiserror::Error)]
pub enum PlaybookServiceError {
    #[error(transparent)]
    Violation(#[from] RecordViolation),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlaybookServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::NotFound) | Self::Violation(RecordViolation::UnknownProfile(_))
        )
    }
}
