use super::domain::{Meeting, Profile};
use serde::Serialize;

/// Composite rating plus the components it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingBreakdown {
    pub looks: f64,
    pub avg_date_rating: f64,
    pub avg_performance_rating: f64,
    pub overall: f64,
    pub meeting_count: usize,
    pub date_count: usize,
    pub performance_count: usize,
}

impl RatingBreakdown {
    pub fn has_meetings(&self) -> bool {
        self.meeting_count > 0
    }

    /// Rating eligible for ranking views. Profiles nobody has met yet have none,
    /// even when the looks-only formula would produce a number.
    pub fn ranking_score(&self) -> Option<f64> {
        self.has_meetings().then_some(self.overall)
    }
}

/// Rounds half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Three-way average of looks, home-run performance, and date quality.
///
/// Meetings that belong to other profiles are skipped, so callers may pass an
/// unfiltered collection.
pub fn composite_rating<'a, I>(profile: &Profile, meetings: I) -> RatingBreakdown
where
    I: IntoIterator<Item = &'a Meeting>,
{
    let mut meeting_count = 0;
    let mut date_count = 0;
    let mut date_sum = 0.0;
    let mut performance_count = 0;
    let mut performance_sum = 0.0;

    for meeting in meetings
        .into_iter()
        .filter(|meeting| meeting.profile_id == profile.id)
    {
        meeting_count += 1;
        if meeting.is_expense() {
            continue;
        }

        date_count += 1;
        date_sum += meeting.date_rating();

        if let Some(score) = meeting.performance_score() {
            performance_count += 1;
            performance_sum += score;
        }
    }

    let looks = profile.looks();
    let avg_date_rating = mean(date_sum, date_count);
    let avg_performance_rating = mean(performance_sum, performance_count);
    let overall = round1((looks + avg_performance_rating + avg_date_rating) / 3.0);

    RatingBreakdown {
        looks,
        avg_date_rating,
        avg_performance_rating,
        overall,
        meeting_count,
        date_count,
        performance_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playbook::tests::common::{expense, home_run, outing, profile};

    #[test]
    fn looks_and_date_ratings_without_home_runs() {
        let p = profile("p", 8);
        let meetings = vec![outing("p", 6, 0.0, 1), outing("p", 8, 0.0, 2)];

        let rating = composite_rating(&p, &meetings);

        assert_eq!(rating.avg_date_rating, 7.0);
        assert_eq!(rating.avg_performance_rating, 0.0);
        assert_eq!(rating.overall, 5.0);
    }

    #[test]
    fn home_run_contributes_performance() {
        let q = profile("q", 9);
        let meetings = vec![home_run("q", 9, 10, 0.0, 1)];

        let rating = composite_rating(&q, &meetings);

        assert_eq!(rating.avg_date_rating, 9.0);
        assert_eq!(rating.avg_performance_rating, 10.0);
        assert_eq!(rating.overall, 9.3);
    }

    #[test]
    fn expenses_do_not_dilute_date_quality() {
        let p = profile("p", 6);
        let meetings = vec![outing("p", 9, 20.0, 1), expense("p", 45.0, 2)];

        let rating = composite_rating(&p, &meetings);

        assert_eq!(rating.meeting_count, 2);
        assert_eq!(rating.date_count, 1);
        assert_eq!(rating.avg_date_rating, 9.0);
        assert_eq!(rating.overall, 5.0);
    }

    #[test]
    fn looks_only_score_is_not_rankable() {
        let p = profile("p", 9);
        let none: Vec<Meeting> = Vec::new();
        let rating = composite_rating(&p, &none);

        assert_eq!(rating.overall, 3.0);
        assert!(!rating.has_meetings());
        assert_eq!(rating.ranking_score(), None);
    }

    #[test]
    fn other_profiles_meetings_are_ignored() {
        let p = profile("p", 4);
        let meetings = vec![outing("someone-else", 10, 0.0, 1)];

        let rating = composite_rating(&p, &meetings);

        assert_eq!(rating.meeting_count, 0);
        assert_eq!(rating.overall, round1(4.0 / 3.0));
    }

    #[test]
    fn out_of_range_inputs_stay_bounded() {
        let mut p = profile("p", 10);
        p.looks_rating = Some(200);
        let mut wild = home_run("p", 10, 10, 0.0, 1);
        wild.rating = Some(u8::MAX);
        wild.performance_rating = Some(u8::MAX);

        let rating = composite_rating(&p, &[wild]);

        assert_eq!(rating.overall, 10.0);
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(9.333_333), 9.3);
        assert_eq!(round1(0.04), 0.0);
    }
}
