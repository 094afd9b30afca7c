use chrono::{DateTime, Utc};

use super::domain::{
    Base, Meeting, MeetingDraft, MeetingId, Profile, ProfileDraft, ProfileId, RecordSet,
    UpcomingDate, UpcomingDateDraft, UpcomingDateId, EXPENSE_KIND, MAX_RATING,
};

/// Validation errors raised before a record reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordViolation {
    #[error("profile name must not be empty")]
    EmptyName,
    #[error("{field} must be between 0 and 10 (found {found})")]
    RatingOutOfRange { field: &'static str, found: u8 },
    #[error("amount spent must be a non-negative number")]
    InvalidAmount,
    #[error("meeting type must not be empty")]
    EmptyKind,
    #[error("'{kind}' entries require a rating")]
    MissingRating { kind: String },
    #[error("expense entries require an amount greater than zero")]
    EmptyExpense,
    #[error("expense entries cannot record a base")]
    ExpenseWithBase,
    #[error("performance rating requires a home run")]
    PerformanceWithoutHomeRun,
    #[error("unknown profile {0}")]
    UnknownProfile(ProfileId),
}

fn check_rating(field: &'static str, value: Option<u8>) -> Result<(), RecordViolation> {
    match value {
        Some(found) if found > MAX_RATING => Err(RecordViolation::RatingOutOfRange { field, found }),
        _ => Ok(()),
    }
}

fn check_meeting(
    kind: &str,
    amount_spent: f64,
    base: Option<&Base>,
    rating: Option<u8>,
    performance_rating: Option<u8>,
) -> Result<(), RecordViolation> {
    if kind.is_empty() {
        return Err(RecordViolation::EmptyKind);
    }
    if !amount_spent.is_finite() || amount_spent < 0.0 {
        return Err(RecordViolation::InvalidAmount);
    }
    check_rating("rating", rating)?;
    check_rating("performance_rating", performance_rating)?;

    if kind.eq_ignore_ascii_case(EXPENSE_KIND) {
        if amount_spent <= 0.0 {
            return Err(RecordViolation::EmptyExpense);
        }
        if base.is_some() {
            return Err(RecordViolation::ExpenseWithBase);
        }
    } else if rating.is_none() {
        return Err(RecordViolation::MissingRating {
            kind: kind.to_string(),
        });
    }

    if performance_rating.is_some() && base != Some(&Base::Home) {
        return Err(RecordViolation::PerformanceWithoutHomeRun);
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Guard responsible for producing store-ready records from inbound drafts.
#[derive(Debug, Clone, Default)]
pub struct RecordGuard;

impl RecordGuard {
    pub fn profile_from_draft(
        &self,
        draft: ProfileDraft,
        id: ProfileId,
        created_at: DateTime<Utc>,
    ) -> Result<Profile, RecordViolation> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(RecordViolation::EmptyName);
        }
        check_rating("looks_rating", draft.looks_rating)?;

        Ok(Profile {
            id,
            name,
            status: draft.status,
            looks_rating: draft.looks_rating,
            bench: draft.bench,
            created_at,
            notes: trimmed(draft.notes),
            likes: draft.likes,
            dislikes: draft.dislikes,
            image_url: trimmed(draft.image_url),
        })
    }

    /// Validate a meeting for `profile`, which is `None` when the caller could
    /// not find it. Undated drafts are stamped with `now`.
    pub fn meeting_from_draft(
        &self,
        profile_id: &ProfileId,
        profile: Option<&Profile>,
        draft: MeetingDraft,
        id: MeetingId,
        now: DateTime<Utc>,
    ) -> Result<Meeting, RecordViolation> {
        if profile.is_none() {
            return Err(RecordViolation::UnknownProfile(profile_id.clone()));
        }

        let kind = draft.kind.trim().to_string();
        check_meeting(
            &kind,
            draft.amount_spent,
            draft.base.as_ref(),
            draft.rating,
            draft.performance_rating,
        )?;

        Ok(Meeting {
            id,
            profile_id: profile_id.clone(),
            kind,
            amount_spent: draft.amount_spent,
            base: draft.base,
            rating: draft.rating,
            performance_rating: draft.performance_rating,
            date: draft.date.unwrap_or(now),
            notes: trimmed(draft.notes),
        })
    }

    pub fn upcoming_from_draft(
        &self,
        profile: Option<&Profile>,
        draft: UpcomingDateDraft,
        id: UpcomingDateId,
    ) -> Result<UpcomingDate, RecordViolation> {
        if profile.is_none() {
            return Err(RecordViolation::UnknownProfile(draft.profile_id));
        }

        let kind = draft.kind.trim().to_string();
        if kind.is_empty() {
            return Err(RecordViolation::EmptyKind);
        }

        Ok(UpcomingDate {
            id,
            profile_id: draft.profile_id,
            kind,
            date: draft.date,
            notes: trimmed(draft.notes),
        })
    }

    /// Apply the draft rules to an already materialised record set, such as a
    /// snapshot preloaded into a store. The first violation wins.
    pub fn check_records(&self, records: &RecordSet) -> Result<(), RecordViolation> {
        for profile in &records.profiles {
            if profile.name.trim().is_empty() {
                return Err(RecordViolation::EmptyName);
            }
            check_rating("looks_rating", profile.looks_rating)?;
        }

        for meeting in &records.meetings {
            if records.profile(&meeting.profile_id).is_none() {
                return Err(RecordViolation::UnknownProfile(meeting.profile_id.clone()));
            }
            check_meeting(
                meeting.kind.trim(),
                meeting.amount_spent,
                meeting.base.as_ref(),
                meeting.rating,
                meeting.performance_rating,
            )?;
        }

        for date in &records.upcoming_dates {
            if records.profile(&date.profile_id).is_none() {
                return Err(RecordViolation::UnknownProfile(date.profile_id.clone()));
            }
            if date.kind.trim().is_empty() {
                return Err(RecordViolation::EmptyKind);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playbook::tests::common::{
        expense, home_run, meeting_draft, now, outing, profile, profile_draft, strikeout, upcoming,
    };

    fn pid() -> ProfileId {
        ProfileId("p".to_string())
    }

    fn validate(draft: MeetingDraft) -> Result<Meeting, RecordViolation> {
        let owner = profile("p", 7);
        RecordGuard.meeting_from_draft(
            &pid(),
            Some(&owner),
            draft,
            MeetingId("m".to_string()),
            now(),
        )
    }

    #[test]
    fn profile_names_are_trimmed_and_required() {
        let profile = RecordGuard
            .profile_from_draft(profile_draft("  Jess ", 8), pid(), now())
            .expect("valid draft");
        assert_eq!(profile.name, "Jess");
        assert_eq!(profile.created_at, now());

        let error = RecordGuard
            .profile_from_draft(profile_draft("   ", 8), pid(), now())
            .expect_err("blank name");
        assert_eq!(error, RecordViolation::EmptyName);
    }

    #[test]
    fn looks_above_ten_are_rejected() {
        let error = RecordGuard
            .profile_from_draft(profile_draft("Jess", 11), pid(), now())
            .expect_err("looks out of range");
        assert_eq!(
            error,
            RecordViolation::RatingOutOfRange {
                field: "looks_rating",
                found: 11
            }
        );
    }

    #[test]
    fn undated_meetings_are_stamped_now() {
        let meeting = validate(meeting_draft(" dinner ", 45.0, Some(7))).expect("valid");
        assert_eq!(meeting.kind, "dinner");
        assert_eq!(meeting.date, now());
    }

    #[test]
    fn non_expense_meetings_need_a_rating() {
        let error = validate(meeting_draft("drinks", 20.0, None)).expect_err("rating required");
        assert!(matches!(error, RecordViolation::MissingRating { .. }));
    }

    #[test]
    fn expenses_need_an_amount_and_no_base() {
        assert_eq!(
            validate(meeting_draft("expense", 0.0, None)).expect_err("zero expense"),
            RecordViolation::EmptyExpense
        );

        let mut draft = meeting_draft("Expense", 20.0, None);
        draft.base = Some(Base::Home);
        assert_eq!(
            validate(draft).expect_err("expense with base"),
            RecordViolation::ExpenseWithBase
        );

        assert!(validate(meeting_draft("expense", 20.0, None)).is_ok());
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                validate(meeting_draft("date", amount, Some(5))).expect_err("bad amount"),
                RecordViolation::InvalidAmount
            );
        }
    }

    #[test]
    fn performance_requires_home_run() {
        let mut draft = meeting_draft("date", 10.0, Some(6));
        draft.performance_rating = Some(8);
        draft.base = Some(Base::Strikeout);
        assert_eq!(
            validate(draft.clone()).expect_err("performance without home"),
            RecordViolation::PerformanceWithoutHomeRun
        );

        draft.base = Some(Base::Home);
        let meeting = validate(draft).expect("home run with performance");
        assert!(meeting.is_home_run());
    }

    #[test]
    fn unknown_profiles_are_rejected() {
        let error = RecordGuard
            .meeting_from_draft(
                &pid(),
                None,
                meeting_draft("date", 10.0, Some(5)),
                MeetingId("m".to_string()),
                now(),
            )
            .expect_err("unknown profile");
        assert_eq!(error, RecordViolation::UnknownProfile(pid()));
    }

    #[test]
    fn record_sets_are_checked_with_the_draft_rules() {
        let mut records = RecordSet {
            profiles: vec![profile("p", 7)],
            meetings: vec![
                outing("p", 6, 40.0, -3),
                home_run("p", 8, 9, 90.0, -2),
                strikeout("p", 4, 15.0, -1),
                expense("p", 25.0, -1),
            ],
            upcoming_dates: vec![upcoming("p", 2)],
        };
        assert_eq!(RecordGuard.check_records(&records), Ok(()));

        records.meetings.push(outing("ghost", 5, 10.0, -1));
        assert_eq!(
            RecordGuard.check_records(&records),
            Err(RecordViolation::UnknownProfile(ProfileId("ghost".to_string())))
        );

        records.meetings.pop();
        let mut taxed = expense("p", 30.0, -1);
        taxed.base = Some(Base::Home);
        records.meetings.push(taxed);
        assert_eq!(
            RecordGuard.check_records(&records),
            Err(RecordViolation::ExpenseWithBase)
        );

        records.meetings.pop();
        records.profiles[0].looks_rating = Some(12);
        assert!(matches!(
            RecordGuard.check_records(&records),
            Err(RecordViolation::RatingOutOfRange { field: "looks_rating", .. })
        ));
    }
}
