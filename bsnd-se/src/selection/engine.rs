//! Single-category selection

use bsnd_common::{SoundAsset, SoundCategory};

use super::{is_eligible, PlaybackContext, RandomSource};

/// Pick the best matching asset of `category` for `context`
///
/// `candidates` may include inactive assets and assets of other categories;
/// both are filtered out. Returns `None` when nothing is eligible, including
/// for an empty candidate list.
pub fn select_asset<'a, R: RandomSource + ?Sized>(
    category: SoundCategory,
    context: &PlaybackContext,
    candidates: &'a [SoundAsset],
    rng: &mut R,
) -> Option<&'a SoundAsset> {
    let eligible = eligible_candidates(category, context, candidates);
    pick(&eligible, rng)
}

/// Candidates of `category` passing the eligibility filter, in input order
pub fn eligible_candidates<'a>(
    category: SoundCategory,
    context: &PlaybackContext,
    candidates: &'a [SoundAsset],
) -> Vec<&'a SoundAsset> {
    candidates
        .iter()
        .filter(|asset| asset.category == category && is_eligible(asset, context))
        .collect()
}

/// Every asset sharing the maximum priority
pub fn top_priority<'a>(eligible: &[&'a SoundAsset]) -> Vec<&'a SoundAsset> {
    let Some(max) = eligible.iter().map(|asset| asset.conditions.priority).max() else {
        return Vec::new();
    };

    eligible
        .iter()
        .copied()
        .filter(|asset| asset.conditions.priority == max)
        .collect()
}

/// Rank already-eligible assets and break ties
pub(super) fn pick<'a, R: RandomSource + ?Sized>(
    eligible: &[&'a SoundAsset],
    rng: &mut R,
) -> Option<&'a SoundAsset> {
    let tied = top_priority(eligible);
    match tied.len() {
        0 => None,
        1 => Some(tied[0]),
        n => Some(tied[rng.pick_index(n)]),
    }
}
