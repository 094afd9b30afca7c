use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use playbook::error::AppError;
use playbook::import::{load_snapshot, parse_datetime, MeetingCsvImporter};
use playbook::playbook::{
    Meeting, Period, Profile, ProfileId, RecordGuard, RecordSet, RecordStore, RecordViolation,
    RosterSort, StoreError, UpcomingDate,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store; profiles keep insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    profiles: Arc<Mutex<Vec<Profile>>>,
    meetings: Arc<Mutex<Vec<Meeting>>>,
    upcoming: Arc<Mutex<Vec<UpcomingDate>>>,
}

impl InMemoryRecordStore {
    /// Seed a store from a snapshot. The records pass the same guard as
    /// records written through the service.
    pub(crate) fn from_records(records: RecordSet) -> Result<Self, RecordViolation> {
        RecordGuard.check_records(&records)?;
        Ok(Self {
            profiles: Arc::new(Mutex::new(records.profiles)),
            meetings: Arc::new(Mutex::new(records.meetings)),
            upcoming: Arc::new(Mutex::new(records.upcoming_dates)),
        })
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store mutex poisoned".to_string())
}

impl RecordStore for InMemoryRecordStore {
    fn insert_profile(&self, profile: Profile) -> Result<Profile, StoreError> {
        let mut guard = self.profiles.lock().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == profile.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(profile.clone());
        Ok(profile)
    }

    fn fetch_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let guard = self.profiles.lock().map_err(poisoned)?;
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.lock().map_err(poisoned)?.clone())
    }

    fn insert_meeting(&self, meeting: Meeting) -> Result<Meeting, StoreError> {
        let mut guard = self.meetings.lock().map_err(poisoned)?;
        guard.push(meeting.clone());
        Ok(meeting)
    }

    fn meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        Ok(self.meetings.lock().map_err(poisoned)?.clone())
    }

    fn meetings_for(&self, id: &ProfileId) -> Result<Vec<Meeting>, StoreError> {
        let guard = self.meetings.lock().map_err(poisoned)?;
        let mut meetings: Vec<Meeting> = guard
            .iter()
            .filter(|meeting| &meeting.profile_id == id)
            .cloned()
            .collect();
        meetings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(meetings)
    }

    fn insert_upcoming(&self, date: UpcomingDate) -> Result<UpcomingDate, StoreError> {
        let mut guard = self.upcoming.lock().map_err(poisoned)?;
        guard.push(date.clone());
        Ok(date)
    }

    fn upcoming_dates(&self) -> Result<Vec<UpcomingDate>, StoreError> {
        Ok(self.upcoming.lock().map_err(poisoned)?.clone())
    }
}

/// Load a JSON snapshot and append meetings from an optional CSV export.
pub(crate) fn load_records(snapshot: &Path, csv: Option<&Path>) -> Result<RecordSet, AppError> {
    let mut records = load_snapshot(snapshot)?;
    if let Some(path) = csv {
        let meetings = MeetingCsvImporter::from_path(path)?;
        info!(imported = meetings.len(), path = %path.display(), "meetings imported from csv");
        records.meetings.extend(meetings);
    }
    Ok(records)
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

pub(crate) fn parse_period(raw: &str) -> Result<Period, String> {
    raw.parse()
}

pub(crate) fn parse_sort(raw: &str) -> Result<RosterSort, String> {
    raw.parse()
}

pub(crate) fn parse_top(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{raw}' is not a positive leaderboard size")),
        Ok(top) => Ok(top),
    }
}
