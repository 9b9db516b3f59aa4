//! Database initialization
//!
//! Creates the database on first run and brings an existing one up to the
//! current schema. Every step is idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Default value of the `midtro_policy` setting
pub const DEFAULT_MIDTRO_POLICY: &str = "independent";

/// Default value of the `midtro_max_transitions` setting
pub const DEFAULT_MIDTRO_MAX_TRANSITIONS: &str = "16";

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL lets readers proceed while an administrator edits assets
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Limited to one connection: every connection to `sqlite::memory:` would
/// otherwise see its own empty database.
pub async fn init_in_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and default settings
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_sound_assets_table(pool).await?;
    init_default_settings(pool).await?;
    Ok(())
}

/// Create the settings table
///
/// Stores runtime configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the sound_assets table
///
/// `conditions` holds the JSON form of `SoundConditions`.
pub async fn create_sound_assets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sound_assets (
            id TEXT PRIMARY KEY,
            category TEXT NOT NULL CHECK (category IN ('intro', 'background', 'midtro', 'outro', 'ad_intro', 'ad_outro')),
            file_reference TEXT NOT NULL,
            duration_seconds REAL,
            conditions TEXT NOT NULL DEFAULT '{}',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sound_assets_category ON sound_assets(category)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or repair default settings
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "midtro_policy", DEFAULT_MIDTRO_POLICY).await?;
    ensure_setting(pool, "midtro_max_transitions", DEFAULT_MIDTRO_MAX_TRANSITIONS).await?;
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let value: Option<Option<String>> = sqlx::query_scalar(
        "SELECT value FROM settings WHERE key = ?"
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    match value {
        None => {
            // INSERT OR IGNORE: concurrent initializers may race past the lookup
            sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(default_value)
                .execute(pool)
                .await?;

            info!("Initialized setting '{}' with default value: {}", key, default_value);
        }
        Some(None) => {
            sqlx::query("UPDATE settings SET value = ?, updated_at = CURRENT_TIMESTAMP WHERE key = ?")
                .bind(default_value)
                .bind(key)
                .execute(pool)
                .await?;

            warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
        }
        Some(Some(_)) => {}
    }

    Ok(())
}

/// Read a setting value, `None` when missing or NULL
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> = sqlx::query_scalar(
        "SELECT value FROM settings WHERE key = ?"
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value.flatten())
}

/// Write a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
