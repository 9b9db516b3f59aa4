//! Sound asset repository
//!
//! Loads return active and inactive assets alike; filtering by activity is
//! the selection engine's job.

use bsnd_common::{Error, Result, SoundAsset, SoundCategory, SoundConditions};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, category, file_reference, duration_seconds, conditions,
           is_active, created_at, updated_at
    FROM sound_assets
"#;

/// Insert or update an asset
pub async fn save_asset(pool: &SqlitePool, asset: &SoundAsset) -> Result<()> {
    let conditions = serde_json::to_string(&asset.conditions)
        .map_err(|e| Error::Internal(format!("Failed to encode conditions for {}: {}", asset.id, e)))?;

    sqlx::query(
        r#"
        INSERT INTO sound_assets (
            id, category, file_reference, duration_seconds, conditions,
            is_active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            file_reference = excluded.file_reference,
            duration_seconds = excluded.duration_seconds,
            conditions = excluded.conditions,
            is_active = excluded.is_active,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(asset.id.to_string())
    .bind(asset.category.as_str())
    .bind(&asset.file_reference)
    .bind(asset.duration_seconds)
    .bind(conditions)
    .bind(asset.is_active)
    .bind(asset.created_at)
    .bind(bsnd_common::time::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one asset by id
pub async fn get_asset(pool: &SqlitePool, id: Uuid) -> Result<SoundAsset> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Sound asset {}", id)))?;

    asset_from_row(&row)
}

/// Every asset of one category, oldest first
pub async fn load_assets_for_category(
    pool: &SqlitePool,
    category: SoundCategory,
) -> Result<Vec<SoundAsset>> {
    let rows = sqlx::query(&format!(
        "{} WHERE category = ? ORDER BY created_at, id",
        SELECT_COLUMNS
    ))
    .bind(category.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(asset_from_row).collect()
}

/// Candidate lists for several categories
///
/// Every requested category gets an entry, empty when it has no assets.
pub async fn load_assets_by_category(
    pool: &SqlitePool,
    categories: &[SoundCategory],
) -> Result<HashMap<SoundCategory, Vec<SoundAsset>>> {
    let mut by_category = HashMap::with_capacity(categories.len());
    for &category in categories {
        let assets = load_assets_for_category(pool, category).await?;
        by_category.insert(category, assets);
    }
    Ok(by_category)
}

/// Activate or retire an asset
pub async fn set_asset_active(pool: &SqlitePool, id: Uuid, active: bool) -> Result<()> {
    let result = sqlx::query(
        "UPDATE sound_assets SET is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(active)
    .bind(bsnd_common::time::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Sound asset {}", id)));
    }
    Ok(())
}

/// Remove an asset
pub async fn delete_asset(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM sound_assets WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Sound asset {}", id)));
    }
    Ok(())
}

fn asset_from_row(row: &SqliteRow) -> Result<SoundAsset> {
    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| Error::Internal(format!("Invalid asset id '{}': {}", id_str, e)))?;

    let category: String = row.try_get("category")?;
    let category = category
        .parse::<SoundCategory>()
        .map_err(|e| Error::Internal(format!("Asset {}: {}", id, e)))?;

    let conditions_json: String = row.try_get("conditions")?;
    let conditions: SoundConditions = serde_json::from_str(&conditions_json)
        .map_err(|e| Error::Internal(format!("Asset {} has malformed conditions: {}", id, e)))?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(SoundAsset {
        id,
        category,
        file_reference: row.try_get("file_reference")?,
        duration_seconds: row.try_get("duration_seconds")?,
        conditions,
        is_active: row.try_get("is_active")?,
        created_at,
        updated_at,
    })
}
