//! Universal fallback audit
//!
//! Every category should own at least one active asset with no conditions,
//! so selection always has something to return. Selection does not enforce
//! this; the audit reports categories where it does not hold.

use bsnd_common::{Result, SoundAsset, SoundCategory};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{info, warn};

use super::assets::load_assets_by_category;

/// Audit outcome for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAudit {
    pub category: SoundCategory,
    pub total_assets: usize,
    pub active_assets: usize,
    pub universal_fallbacks: usize,
}

impl CategoryAudit {
    pub fn has_fallback(&self) -> bool {
        self.universal_fallbacks > 0
    }
}

/// Audit outcome for all categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackAudit {
    pub healthy: bool,
    pub missing: Vec<SoundCategory>,
    pub categories: Vec<CategoryAudit>,
}

impl FallbackAudit {
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn missing_categories(&self) -> &[SoundCategory] {
        &self.missing
    }
}

/// Check every category for an active universal fallback
///
/// Categories absent from the map count as having no assets.
pub fn audit_fallbacks(assets_by_category: &HashMap<SoundCategory, Vec<SoundAsset>>) -> FallbackAudit {
    let categories: Vec<CategoryAudit> = SoundCategory::ALL
        .iter()
        .map(|&category| {
            let assets = assets_by_category
                .get(&category)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let in_category = || assets.iter().filter(move |a| a.category == category);
            CategoryAudit {
                category,
                total_assets: in_category().count(),
                active_assets: in_category().filter(|a| a.is_active).count(),
                universal_fallbacks: in_category().filter(|a| a.is_universal_fallback()).count(),
            }
        })
        .collect();

    let missing: Vec<SoundCategory> = categories
        .iter()
        .filter(|c| !c.has_fallback())
        .map(|c| c.category)
        .collect();

    FallbackAudit {
        healthy: missing.is_empty(),
        missing,
        categories,
    }
}

/// Load all assets, audit them, and log the outcome
pub async fn run_fallback_audit(pool: &SqlitePool) -> Result<FallbackAudit> {
    let assets = load_assets_by_category(pool, &SoundCategory::ALL).await?;
    let audit = audit_fallbacks(&assets);

    if audit.is_healthy() {
        info!("Fallback audit passed: every category has a universal fallback");
    } else {
        for category in audit.missing_categories() {
            warn!(
                "Category '{}' has no active universal fallback asset; selection may return no match",
                category
            );
        }
    }

    Ok(audit)
}
