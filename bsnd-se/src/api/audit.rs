//! Universal fallback audit endpoint

use axum::{extract::State, Json};

use crate::db::{run_fallback_audit, FallbackAudit};
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/audit/fallbacks
///
/// Reports, per category, whether an active universal fallback exists.
pub async fn get_fallback_audit(State(state): State<AppState>) -> ApiResult<Json<FallbackAudit>> {
    let audit = run_fallback_audit(&state.db).await?;
    Ok(Json(audit))
}
