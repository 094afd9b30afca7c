use super::super::domain::{Meeting, Profile, ProfileId};
use super::views::{ActivityInsight, InsightKind};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub(crate) fn generate_insights(
    profiles: &[Profile],
    meetings: &[Meeting],
    now: DateTime<Utc>,
) -> Vec<ActivityInsight> {
    let mut insights = Vec::new();

    if let Some((profile, days)) = longest_gap(profiles, meetings, now) {
        insights.push(ActivityInsight::new(
            InsightKind::WhoToSeeNext,
            format!(
                "Haven't seen {} in {days} days. Time to reach out!",
                profile.name
            ),
        ));
    }

    let last_week = now - Duration::days(7);
    let week_before = last_week - Duration::days(7);
    let recent = meetings.iter().filter(|m| m.date > last_week).count() as i64;
    let previous = meetings
        .iter()
        .filter(|m| m.date <= last_week && m.date > week_before)
        .count() as i64;

    let change = recent - previous;
    if change != 0 {
        let direction = if change > 0 { "up" } else { "down" };
        insights.push(ActivityInsight::new(
            InsightKind::DatingActivity,
            format!(
                "Your dating activity is {direction} {} dates compared to last week.",
                change.abs()
            ),
        ));
    }

    insights
}

/// Profile whose latest meeting is furthest in the past, in whole days.
/// Someone seen today never qualifies.
fn longest_gap<'a>(
    profiles: &'a [Profile],
    meetings: &[Meeting],
    now: DateTime<Utc>,
) -> Option<(&'a Profile, i64)> {
    let mut latest: HashMap<&ProfileId, DateTime<Utc>> = HashMap::new();
    for meeting in meetings {
        latest
            .entry(&meeting.profile_id)
            .and_modify(|seen| *seen = (*seen).max(meeting.date))
            .or_insert(meeting.date);
    }

    let mut best: Option<(&Profile, i64)> = None;
    for profile in profiles {
        let Some(seen) = latest.get(&profile.id) else {
            continue;
        };
        let days = (now - *seen).num_days();
        if days > best.map_or(0, |(_, gap)| gap) {
            best = Some((profile, days));
        }
    }
    best
}
