use super::domain::{Meeting, Profile, UpcomingDate};
use super::ranking::group_by_profile;
use super::rating::{composite_rating, round1, RatingBreakdown};
use super::spend::{cost_per_outcome, CostPerOutcome, SpendSummary};
use super::upcoming::{upcoming_dates, UpcomingEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSort {
    Name,
    #[default]
    #[serde(alias = "date")]
    DateAdded,
    Status,
}

impl RosterSort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::DateAdded => "Date Added",
            Self::Status => "Status",
        }
    }

    fn compare(self, a: &Profile, b: &Profile) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::DateAdded => b.created_at.cmp(&a.created_at),
            Self::Status => a.status.roster_rank().cmp(&b.status.roster_rank()),
        }
    }
}

impl FromStr for RosterSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" | "date_added" => Ok(Self::DateAdded),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "unknown roster sort '{other}' (expected name, date, or status)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RosterQuery {
    #[serde(default)]
    pub sort: RosterSort,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterCard {
    pub profile: Profile,
    pub status_label: &'static str,
    pub meeting_count: usize,
    pub cpn: CostPerOutcome,
    pub avg_date_rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterView {
    pub active: Vec<RosterCard>,
    pub bench: Vec<RosterCard>,
}

impl RosterView {
    pub fn len(&self) -> usize {
        self.active.len() + self.bench.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.bench.is_empty()
    }
}

fn matches_search(profile: &Profile, search: Option<&str>) -> bool {
    match search.map(str::trim).filter(|query| !query.is_empty()) {
        Some(query) => profile
            .name
            .to_lowercase()
            .contains(&query.to_lowercase()),
        None => true,
    }
}

/// Sorted, searched roster split into active and benched cards.
pub fn roster_view(profiles: &[Profile], meetings: &[Meeting], query: &RosterQuery) -> RosterView {
    let grouped = group_by_profile(meetings);

    let mut selected: Vec<&Profile> = profiles
        .iter()
        .filter(|profile| matches_search(profile, query.search.as_deref()))
        .collect();
    selected.sort_by(|a, b| query.sort.compare(a, b));

    let mut view = RosterView::default();
    for profile in selected {
        let own = grouped.get(&profile.id).map(Vec::as_slice).unwrap_or(&[]);
        let rating = composite_rating(profile, own.iter().copied());
        let spend = cost_per_outcome(own.iter().copied());

        let card = RosterCard {
            profile: profile.clone(),
            status_label: profile.status.label(),
            meeting_count: own.len(),
            cpn: spend.cpn,
            avg_date_rating: round1(rating.avg_date_rating),
        };

        if profile.bench {
            view.bench.push(card);
        } else {
            view.active.push(card);
        }
    }

    view
}

/// Everything the player detail screen shows for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetail {
    pub profile: Profile,
    pub status_label: &'static str,
    pub rating: RatingBreakdown,
    pub spend: SpendSummary,
    pub meetings: Vec<Meeting>,
    pub upcoming: Vec<UpcomingEntry>,
}

impl PlayerDetail {
    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }
}

pub fn player_detail(
    profile: &Profile,
    meetings: &[Meeting],
    dates: &[UpcomingDate],
    now: DateTime<Utc>,
) -> PlayerDetail {
    let mut own: Vec<Meeting> = meetings
        .iter()
        .filter(|meeting| meeting.profile_id == profile.id)
        .cloned()
        .collect();
    own.sort_by(|a, b| b.date.cmp(&a.date));

    PlayerDetail {
        profile: profile.clone(),
        status_label: profile.status.label(),
        rating: composite_rating(profile, &own),
        spend: cost_per_outcome(&own),
        upcoming: upcoming_dates(dates, std::slice::from_ref(profile), now, Some(&profile.id)),
        meetings: own,
    }
}
