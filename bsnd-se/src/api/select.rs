//! Sound selection endpoint
//!
//! `POST /api/internal/select-sounds` builds a playback context from the
//! request, pulls candidate lists from the asset repository and runs the
//! selection engine once per requested category.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use bsnd_common::{SoundAsset, SoundCategory, TimeOfDay};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::db::load_assets_by_category;
use crate::error::{ApiError, ApiResult};
use crate::selection::{
    select_categories, select_midtros, MidtroPolicy, PlaybackContext, RandomSource, RngSource,
    SelectionError, SoundBundle,
};
use crate::AppState;

/// Request body for `POST /api/internal/select-sounds`
#[derive(Debug, Clone, Deserialize)]
pub struct SelectSoundsRequest {
    pub duration_seconds: f64,
    #[serde(default)]
    pub sport_id: Option<i64>,
    #[serde(default)]
    pub league_id: Option<i64>,
    #[serde(default)]
    pub team_id: Option<i64>,
    /// Derived from the local wall clock when absent
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    /// 0-6 with Sunday = 0; derived from the local wall clock when absent
    #[serde(default)]
    pub day_of_week: Option<i64>,
    /// Categories to fill; all six when absent
    #[serde(default)]
    pub categories: Option<Vec<SoundCategory>>,
    /// Number of topic transitions needing a midtro
    #[serde(default)]
    pub midtro_count: usize,
    /// Falls back to the `midtro_policy` setting
    #[serde(default)]
    pub midtro_policy: Option<MidtroPolicy>,
    /// Makes tie-breaks reproducible
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Response body for `POST /api/internal/select-sounds`
#[derive(Debug, Serialize)]
pub struct SelectSoundsResponse<'a> {
    pub context: &'a PlaybackContext,
    pub selections: SoundBundle<'a>,
    pub midtros: Vec<&'a SoundAsset>,
    pub midtro_policy: MidtroPolicy,
    /// Nothing matched: the briefing goes out without sound
    pub speech_only: bool,
}

impl SelectSoundsRequest {
    /// Build the playback context, filling wall-clock fields from `Local::now()`
    pub fn to_context(&self) -> Result<PlaybackContext, SelectionError> {
        let now = Local::now();
        let mut context = PlaybackContext::new(self.duration_seconds, &now);
        context.sport_id = self.sport_id;
        context.league_id = self.league_id;
        context.team_id = self.team_id;

        if let Some(time_of_day) = self.time_of_day {
            context.time_of_day = time_of_day;
        }
        if let Some(day) = self.day_of_week {
            let day = u8::try_from(day).map_err(|_| {
                SelectionError::InvalidContext(format!("day_of_week must be 0-6, got {}", day))
            })?;
            context.day_of_week = day;
        }

        context.validate()?;
        Ok(context)
    }

    fn requested_categories(&self) -> Vec<SoundCategory> {
        match &self.categories {
            Some(categories) => categories.clone(),
            None => SoundCategory::ALL.to_vec(),
        }
    }
}

/// POST /api/internal/select-sounds
pub async fn select_sounds(
    State(state): State<AppState>,
    Json(request): Json<SelectSoundsRequest>,
) -> ApiResult<Response> {
    let context = request.to_context()?;

    if request.midtro_count > state.settings.midtro_max_transitions {
        return Err(ApiError::BadRequest(format!(
            "midtro_count {} exceeds the limit of {}",
            request.midtro_count, state.settings.midtro_max_transitions
        )));
    }
    let policy = request
        .midtro_policy
        .unwrap_or(state.settings.midtro_policy);

    let categories = request.requested_categories();
    let mut to_load = categories.clone();
    if request.midtro_count > 0 && !to_load.contains(&SoundCategory::Midtro) {
        to_load.push(SoundCategory::Midtro);
    }
    let assets = load_assets_by_category(&state.db, &to_load).await?;

    // Random sources live only inside this synchronous section
    let response = match request.seed {
        Some(seed) => {
            let mut rng = RngSource::seeded(seed);
            respond(&context, &assets, &categories, &request, policy, &mut rng)
        }
        None => {
            let mut rng = RngSource::thread();
            respond(&context, &assets, &categories, &request, policy, &mut rng)
        }
    };

    Ok(response)
}

fn respond<R: RandomSource>(
    context: &PlaybackContext,
    assets: &HashMap<SoundCategory, Vec<SoundAsset>>,
    categories: &[SoundCategory],
    request: &SelectSoundsRequest,
    policy: MidtroPolicy,
    rng: &mut R,
) -> Response {
    let selections = select_categories(context, assets, categories, rng);

    let midtro_candidates = assets
        .get(&SoundCategory::Midtro)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let midtros = select_midtros(context, midtro_candidates, request.midtro_count, policy, rng);

    for category in categories {
        match selections.get(*category) {
            Some(asset) => debug!("Selected {} for {}", asset.id, category),
            None => debug!("No match for {}", category),
        }
    }

    let speech_only = selections.is_empty() && midtros.is_empty();
    if speech_only {
        warn!(
            "No sound matched any requested category (duration={}s, sport={:?}); briefing will be speech-only",
            context.duration_seconds, context.sport_id
        );
    }

    Json(SelectSoundsResponse {
        context,
        selections,
        midtros,
        midtro_policy: policy,
        speech_only,
    })
    .into_response()
}
