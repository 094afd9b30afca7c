use super::domain::{Meeting, Profile, ProfileId};
use super::rating::composite_rating;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_TOP_N: usize = 3;

/// A profile with its computed rating attached; the source profile is cloned,
/// never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    pub limit: usize,
    pub exclude_benched: bool,
}

impl RankingOptions {
    pub fn top(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOP_N,
            exclude_benched: false,
        }
    }
}

pub(crate) fn group_by_profile(meetings: &[Meeting]) -> HashMap<&ProfileId, Vec<&Meeting>> {
    let mut grouped: HashMap<&ProfileId, Vec<&Meeting>> = HashMap::new();
    for meeting in meetings {
        grouped.entry(&meeting.profile_id).or_default().push(meeting);
    }
    grouped
}

/// Every profile with at least one meeting, best rating first.
///
/// The sort is stable, so equally rated profiles keep their input order.
pub fn rank_profiles(
    profiles: &[Profile],
    meetings: &[Meeting],
    exclude_benched: bool,
) -> Vec<RankedProfile> {
    let grouped = group_by_profile(meetings);

    let mut ranked: Vec<RankedProfile> = profiles
        .iter()
        .filter(|profile| !(exclude_benched && profile.bench))
        .filter_map(|profile| {
            let own = grouped.get(&profile.id)?;
            composite_rating(profile, own.iter().copied())
                .ranking_score()
                .map(|rating| RankedProfile {
                    profile: profile.clone(),
                    rating,
                })
        })
        .collect();

    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked
}

/// The best `options.limit` profiles; fewer when fewer qualify.
pub fn top_profiles(
    profiles: &[Profile],
    meetings: &[Meeting],
    options: RankingOptions,
) -> Vec<RankedProfile> {
    let mut ranked = rank_profiles(profiles, meetings, options.exclude_benched);
    ranked.truncate(options.limit);
    ranked
}
