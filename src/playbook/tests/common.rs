use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::playbook::domain::{
    Base, Meeting, MeetingDraft, MeetingId, Profile, ProfileDraft, ProfileId, ProfileStatus,
    UpcomingDate, UpcomingDateId,
};
use crate::playbook::report::ReportOptions;
use crate::playbook::store::{RecordStore, StoreError};
use crate::playbook::{playbook_router, PlaybookService};

/// Wednesday afternoon; every fixture date is relative to it.
pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 30, 15, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn at(day: i64) -> DateTime<Utc> {
    now() + Duration::days(day)
}

pub(crate) fn profile(id: &str, looks: u8) -> Profile {
    Profile {
        id: ProfileId(id.to_string()),
        name: format!("Profile {id}"),
        status: ProfileStatus::default(),
        looks_rating: Some(looks),
        bench: false,
        created_at: at(-60),
        notes: None,
        likes: Vec::new(),
        dislikes: Vec::new(),
        image_url: None,
    }
}

fn meeting(profile_id: &str, kind: &str, amount: f64, day: i64) -> Meeting {
    static SEQUENCE: AtomicU64 = AtomicU64::new(1);
    let id = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    Meeting {
        id: MeetingId(format!("fixture-{id}")),
        profile_id: ProfileId(profile_id.to_string()),
        kind: kind.to_string(),
        amount_spent: amount,
        base: None,
        rating: None,
        performance_rating: None,
        date: at(day),
        notes: None,
    }
}

pub(crate) fn outing(profile_id: &str, rating: u8, amount: f64, day: i64) -> Meeting {
    Meeting {
        rating: Some(rating),
        ..meeting(profile_id, "date", amount, day)
    }
}

pub(crate) fn home_run(
    profile_id: &str,
    rating: u8,
    performance: u8,
    amount: f64,
    day: i64,
) -> Meeting {
    Meeting {
        base: Some(Base::Home),
        performance_rating: Some(performance),
        ..outing(profile_id, rating, amount, day)
    }
}

pub(crate) fn strikeout(profile_id: &str, rating: u8, amount: f64, day: i64) -> Meeting {
    Meeting {
        base: Some(Base::Strikeout),
        ..outing(profile_id, rating, amount, day)
    }
}

pub(crate) fn expense(profile_id: &str, amount: f64, day: i64) -> Meeting {
    meeting(profile_id, "expense", amount, day)
}

pub(crate) fn upcoming(profile_id: &str, day: i64) -> UpcomingDate {
    UpcomingDate {
        id: UpcomingDateId(format!("upcoming-{profile_id}-{day}")),
        profile_id: ProfileId(profile_id.to_string()),
        kind: "dinner".to_string(),
        date: at(day),
        notes: None,
    }
}

pub(crate) fn profile_draft(name: &str, looks: u8) -> ProfileDraft {
    ProfileDraft {
        name: name.to_string(),
        status: ProfileStatus::Dating,
        looks_rating: Some(looks),
        bench: false,
        notes: None,
        likes: vec!["sushi".to_string()],
        dislikes: Vec::new(),
        image_url: None,
    }
}

pub(crate) fn meeting_draft(kind: &str, amount: f64, rating: Option<u8>) -> MeetingDraft {
    MeetingDraft {
        kind: kind.to_string(),
        amount_spent: amount,
        base: None,
        rating,
        performance_rating: None,
        date: None,
        notes: None,
    }
}

pub(crate) fn build_service() -> (PlaybookService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = PlaybookService::new(store.clone(), ReportOptions::default());
    (service, store)
}

#[derive(Default, Clone)]
pub(crate) struct MemoryStore {
    profiles: Arc<Mutex<Vec<Profile>>>,
    meetings: Arc<Mutex<HashMap<ProfileId, Vec<Meeting>>>>,
    upcoming: Arc<Mutex<Vec<UpcomingDate>>>,
}

impl RecordStore for MemoryStore {
    fn insert_profile(&self, profile: Profile) -> Result<Profile, StoreError> {
        let mut guard = self.profiles.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.id == profile.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(profile.clone());
        Ok(profile)
    }

    fn fetch_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let guard = self.profiles.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.lock().expect("store mutex poisoned").clone())
    }

    fn insert_meeting(&self, meeting: Meeting) -> Result<Meeting, StoreError> {
        let mut guard = self.meetings.lock().expect("store mutex poisoned");
        guard
            .entry(meeting.profile_id.clone())
            .or_default()
            .push(meeting.clone());
        Ok(meeting)
    }

    fn meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let guard = self.meetings.lock().expect("store mutex poisoned");
        Ok(guard.values().flatten().cloned().collect())
    }

    fn meetings_for(&self, id: &ProfileId) -> Result<Vec<Meeting>, StoreError> {
        let guard = self.meetings.lock().expect("store mutex poisoned");
        let mut meetings = guard.get(id).cloned().unwrap_or_default();
        meetings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(meetings)
    }

    fn insert_upcoming(&self, date: UpcomingDate) -> Result<UpcomingDate, StoreError> {
        self.upcoming
            .lock()
            .expect("store mutex poisoned")
            .push(date.clone());
        Ok(date)
    }

    fn upcoming_dates(&self) -> Result<Vec<UpcomingDate>, StoreError> {
        Ok(self.upcoming.lock().expect("store mutex poisoned").clone())
    }
}

pub(crate) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn insert_profile(&self, _profile: Profile) -> Result<Profile, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_profile(&self, _id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_meeting(&self, _meeting: Meeting) -> Result<Meeting, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn meetings_for(&self, _id: &ProfileId) -> Result<Vec<Meeting>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_upcoming(&self, _date: UpcomingDate) -> Result<UpcomingDate, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn upcoming_dates(&self) -> Result<Vec<UpcomingDate>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) fn router_with_service(service: PlaybookService<MemoryStore>) -> axum::Router {
    playbook_router(Arc::new(service))
}
