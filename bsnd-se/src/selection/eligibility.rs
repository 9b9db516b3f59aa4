//! Eligibility filter
//!
//! An asset is eligible when it is active and every condition axis it sets
//! is satisfied by the context. Axes combine with strict AND.

use bsnd_common::db::models::restriction;
use bsnd_common::{SoundAsset, SoundConditions};

use super::PlaybackContext;

/// True when `asset` may be selected for `context`
pub fn is_eligible(asset: &SoundAsset, context: &PlaybackContext) -> bool {
    asset.is_active && conditions_match(&asset.conditions, context)
}

fn conditions_match(conditions: &SoundConditions, context: &PlaybackContext) -> bool {
    duration_matches(conditions, context.duration_seconds)
        && membership_matches(&conditions.sport_ids, context.sport_id)
        && membership_matches(&conditions.league_ids, context.league_id)
        && membership_matches(&conditions.team_ids, context.team_id)
        && conditions
            .time_of_day
            .map_or(true, |wanted| wanted == context.time_of_day)
        && restriction(&conditions.day_of_week)
            .map_or(true, |days| days.contains(&context.day_of_week))
}

fn duration_matches(conditions: &SoundConditions, duration_seconds: f64) -> bool {
    let under_max = conditions
        .max_duration_seconds
        .map_or(true, |max| duration_seconds <= max as f64);
    let over_min = conditions
        .min_duration_seconds
        .map_or(true, |min| duration_seconds >= min as f64);
    under_max && over_min
}

/// A restricted axis needs a context id that is present and listed
fn membership_matches(allowed: &Option<Vec<i64>>, id: Option<i64>) -> bool {
    match restriction(allowed) {
        None => true,
        Some(ids) => id.map_or(false, |id| ids.contains(&id)),
    }
}
