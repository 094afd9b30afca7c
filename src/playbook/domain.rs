use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category value that marks a meeting record as a pure spend entry.
pub const EXPENSE_KIND: &str = "expense";

/// Upper bound shared by looks, date, and performance ratings.
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpcomingDateId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Prospect,
    Dating,
    Situationship,
    SidePiece,
    Wifey,
}

impl ProfileStatus {
    /// Roster ordering, most committed first.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Wifey,
            Self::Dating,
            Self::Situationship,
            Self::SidePiece,
            Self::Prospect,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospect => "Prospect",
            Self::Dating => "Dating",
            Self::Situationship => "Situationship",
            Self::SidePiece => "Side Piece",
            Self::Wifey => "Wifey",
        }
    }

    pub const fn roster_rank(self) -> u8 {
        match self {
            Self::Wifey => 0,
            Self::Dating => 1,
            Self::Situationship => 2,
            Self::SidePiece => 3,
            Self::Prospect => 4,
        }
    }
}

/// Outcome marker recorded on a meeting.
///
/// Unrecognized markers are kept verbatim so they still count as "a base was
/// recorded" while never comparing equal to [`Base::Home`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Base {
    Strikeout,
    Home,
    Other(String),
}

impl Base {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Strikeout => "strikeout",
            Self::Home => "home",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Strikeout => "Strikeout",
            Self::Home => "Home Run",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Base {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Self::Home,
            "strikeout" => Self::Strikeout,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Base {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Base> for String {
    fn from(value: Base) -> Self {
        value.as_str().to_string()
    }
}

/// A tracked contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looks_rating: Option<u8>,
    #[serde(default)]
    pub bench: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub likes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dislikes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Profile {
    /// Looks rating as used by the composite score; unset counts as zero.
    pub fn looks(&self) -> f64 {
        f64::from(self.looks_rating.unwrap_or(0).min(MAX_RATING))
    }
}

/// A dated interaction or expense tied to exactly one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub profile_id: ProfileId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount_spent: f64,
    #[serde(
        default,
        deserialize_with = "empty_base_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub base: Option<Base>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_rating: Option<u8>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Meeting {
    pub fn is_expense(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case(EXPENSE_KIND)
    }

    /// Spend contributed by this record. Malformed amounts contribute nothing.
    pub fn spend(&self) -> f64 {
        if self.amount_spent.is_finite() {
            self.amount_spent.max(0.0)
        } else {
            0.0
        }
    }

    /// Base marker with aggregation meaning; expenses never carry one.
    pub fn outcome(&self) -> Option<&Base> {
        if self.is_expense() {
            None
        } else {
            self.base.as_ref()
        }
    }

    pub fn is_home_run(&self) -> bool {
        matches!(self.outcome(), Some(Base::Home))
    }

    /// Date-quality rating; absent ratings count as zero.
    pub fn date_rating(&self) -> f64 {
        f64::from(self.rating.unwrap_or(0).min(MAX_RATING))
    }

    /// Performance rating, only when it is meaningful for this record.
    pub fn performance_score(&self) -> Option<f64> {
        if !self.is_home_run() {
            return None;
        }

        self.performance_rating
            .filter(|rating| *rating > 0)
            .map(|rating| f64::from(rating.min(MAX_RATING)))
    }
}

/// A scheduled future interaction; carried through untouched by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingDate {
    pub id: UpcomingDateId,
    pub profile_id: ProfileId,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Everything the engine needs for one user, as supplied by the record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub upcoming_dates: Vec<UpcomingDate>,
}

impl RecordSet {
    pub fn profile(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }

    pub fn meetings_for<'a>(&'a self, id: &'a ProfileId) -> impl Iterator<Item = &'a Meeting> {
        self.meetings
            .iter()
            .filter(move |meeting| &meeting.profile_id == id)
    }
}

/// Inbound payload for a new profile, before the store assigns identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub looks_rating: Option<u8>,
    #[serde(default)]
    pub bench: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Inbound payload for a meeting or expense entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDraft {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount_spent: f64,
    #[serde(default, deserialize_with = "empty_base_as_none")]
    pub base: Option<Base>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub performance_rating: Option<u8>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingDateDraft {
    pub profile_id: ProfileId,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn empty_base_as_none<'de, D>(deserializer: D) -> Result<Option<Base>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .filter(|value| !value.trim().is_empty())
        .map(Base::from))
}
