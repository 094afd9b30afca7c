use super::domain::{Meeting, Profile, ProfileId, RecordSet, UpcomingDate};

/// Storage abstraction so the service can be exercised without a backend.
///
/// `profiles` returns insertion order; rankings break ties on that order.
pub trait RecordStore: Send + Sync {
    fn insert_profile(&self, profile: Profile) -> Result<Profile, StoreError>;
    fn fetch_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;
    fn profiles(&self) -> Result<Vec<Profile>, StoreError>;

    fn insert_meeting(&self, meeting: Meeting) -> Result<Meeting, StoreError>;
    fn meetings(&self) -> Result<Vec<Meeting>, StoreError>;
    /// Meetings for one profile, newest first.
    fn meetings_for(&self, id: &ProfileId) -> Result<Vec<Meeting>, StoreError>;

    fn insert_upcoming(&self, date: UpcomingDate) -> Result<UpcomingDate, StoreError>;
    fn upcoming_dates(&self) -> Result<Vec<UpcomingDate>, StoreError>;

    fn snapshot(&self) -> Result<RecordSet, StoreError> {
        Ok(RecordSet {
            profiles: self.profiles()?,
            meetings: self.meetings()?,
            upcoming_dates: self.upcoming_dates()?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
