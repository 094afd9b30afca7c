use super::domain::{Profile, ProfileId, UpcomingDate};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingEntry {
    #[serde(flatten)]
    pub date: UpcomingDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
}

/// Scheduled dates from `now` onwards, soonest first, optionally for one
/// profile.
pub fn upcoming_dates(
    dates: &[UpcomingDate],
    profiles: &[Profile],
    now: DateTime<Utc>,
    profile: Option<&ProfileId>,
) -> Vec<UpcomingEntry> {
    let mut entries: Vec<UpcomingEntry> = dates
        .iter()
        .filter(|date| date.date >= now)
        .filter(|date| profile.map_or(true, |id| &date.profile_id == id))
        .map(|date| UpcomingEntry {
            date: date.clone(),
            profile_name: profiles
                .iter()
                .find(|candidate| candidate.id == date.profile_id)
                .map(|candidate| candidate.name.clone()),
        })
        .collect();

    entries.sort_by_key(|entry| entry.date.date);
    entries
}
