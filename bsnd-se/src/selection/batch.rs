//! Category sweep and midtro selection for one briefing

use bsnd_common::{SoundAsset, SoundCategory};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::engine::{eligible_candidates, pick};
use super::{select_asset, PlaybackContext, RandomSource};

/// One optional asset per playback category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoundBundle<'a> {
    pub intro: Option<&'a SoundAsset>,
    pub background: Option<&'a SoundAsset>,
    pub midtro: Option<&'a SoundAsset>,
    pub outro: Option<&'a SoundAsset>,
    pub ad_intro: Option<&'a SoundAsset>,
    pub ad_outro: Option<&'a SoundAsset>,
}

impl<'a> SoundBundle<'a> {
    pub fn get(&self, category: SoundCategory) -> Option<&'a SoundAsset> {
        match category {
            SoundCategory::Intro => self.intro,
            SoundCategory::Background => self.background,
            SoundCategory::Midtro => self.midtro,
            SoundCategory::Outro => self.outro,
            SoundCategory::AdIntro => self.ad_intro,
            SoundCategory::AdOutro => self.ad_outro,
        }
    }

    fn slot_mut(&mut self, category: SoundCategory) -> &mut Option<&'a SoundAsset> {
        match category {
            SoundCategory::Intro => &mut self.intro,
            SoundCategory::Background => &mut self.background,
            SoundCategory::Midtro => &mut self.midtro,
            SoundCategory::Outro => &mut self.outro,
            SoundCategory::AdIntro => &mut self.ad_intro,
            SoundCategory::AdOutro => &mut self.ad_outro,
        }
    }

    /// No slot filled: the briefing goes out speech-only
    pub fn is_empty(&self) -> bool {
        SoundCategory::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Categories whose slot stayed empty
    pub fn unmatched(&self) -> Vec<SoundCategory> {
        SoundCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_none())
            .collect()
    }
}

/// Select one asset for every category
///
/// A category missing from `assets_by_category` yields `None` in its slot.
pub fn select_all_sounds<'a, R: RandomSource + ?Sized>(
    context: &PlaybackContext,
    assets_by_category: &'a HashMap<SoundCategory, Vec<SoundAsset>>,
    rng: &mut R,
) -> SoundBundle<'a> {
    select_categories(context, assets_by_category, &SoundCategory::ALL, rng)
}

/// Select one asset for each listed category, leaving the others empty
pub fn select_categories<'a, R: RandomSource + ?Sized>(
    context: &PlaybackContext,
    assets_by_category: &'a HashMap<SoundCategory, Vec<SoundAsset>>,
    categories: &[SoundCategory],
    rng: &mut R,
) -> SoundBundle<'a> {
    let mut bundle = SoundBundle::default();
    for &category in categories {
        let candidates = assets_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        *bundle.slot_mut(category) = select_asset(category, context, candidates, rng);
    }
    bundle
}

/// How midtros repeat across the topic transitions of one briefing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidtroPolicy {
    /// Independent draw per transition; repeats possible
    #[default]
    Independent,
    /// Draw once, play the same midtro at every transition
    Reuse,
    /// Avoid repeats until every eligible midtro has played once
    NoRepeat,
}

impl MidtroPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MidtroPolicy::Independent => "independent",
            MidtroPolicy::Reuse => "reuse",
            MidtroPolicy::NoRepeat => "no_repeat",
        }
    }
}

impl fmt::Display for MidtroPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MidtroPolicy {
    type Err = bsnd_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent" => Ok(MidtroPolicy::Independent),
            "reuse" => Ok(MidtroPolicy::Reuse),
            "no_repeat" => Ok(MidtroPolicy::NoRepeat),
            other => Err(bsnd_common::Error::InvalidInput(format!(
                "Unknown midtro policy: {}",
                other
            ))),
        }
    }
}

/// Select a midtro for each of `transitions` topic changes
///
/// Empty when no midtro is eligible. Under `NoRepeat` each draw ranks only
/// the midtros not yet used in this briefing, so a lower-priority midtro can
/// follow once the higher ones have played.
pub fn select_midtros<'a, R: RandomSource + ?Sized>(
    context: &PlaybackContext,
    candidates: &'a [SoundAsset],
    transitions: usize,
    policy: MidtroPolicy,
    rng: &mut R,
) -> Vec<&'a SoundAsset> {
    let eligible = eligible_candidates(SoundCategory::Midtro, context, candidates);
    if transitions == 0 || eligible.is_empty() {
        return Vec::new();
    }

    match policy {
        MidtroPolicy::Independent => (0..transitions)
            .filter_map(|_| pick(&eligible, rng))
            .collect(),
        MidtroPolicy::Reuse => pick(&eligible, rng)
            .map(|midtro| vec![midtro; transitions])
            .unwrap_or_default(),
        MidtroPolicy::NoRepeat => {
            let mut used: HashSet<Uuid> = HashSet::new();
            let mut chosen = Vec::with_capacity(transitions);
            for _ in 0..transitions {
                let mut remaining: Vec<&SoundAsset> = eligible
                    .iter()
                    .copied()
                    .filter(|asset| !used.contains(&asset.id))
                    .collect();
                if remaining.is_empty() {
                    used.clear();
                    remaining = eligible.clone();
                }
                if let Some(midtro) = pick(&remaining, rng) {
                    used.insert(midtro.id);
                    chosen.push(midtro);
                }
            }
            chosen
        }
    }
}
