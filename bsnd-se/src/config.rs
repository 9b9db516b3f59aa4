//! Runtime settings for bsnd-se
//!
//! Bootstrap configuration (root folder, port, logging) lives in
//! `bsnd_common::config`. The values here come from the database `settings`
//! table and are read once at startup.

use bsnd_common::db::init::{get_setting, DEFAULT_MIDTRO_MAX_TRANSITIONS};
use bsnd_common::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::selection::MidtroPolicy;

/// Settings read from the `settings` table
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Policy used when a request names none
    pub midtro_policy: MidtroPolicy,
    /// Upper bound on midtro transitions per request
    pub midtro_max_transitions: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            midtro_policy: MidtroPolicy::default(),
            midtro_max_transitions: default_max_transitions(),
        }
    }
}

fn default_max_transitions() -> usize {
    DEFAULT_MIDTRO_MAX_TRANSITIONS.parse().unwrap_or(16)
}

impl RuntimeSettings {
    /// Load settings, keeping defaults for missing or unparsable values
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let defaults = Self::default();

        let midtro_policy = match get_setting(pool, "midtro_policy").await? {
            Some(value) => value.parse::<MidtroPolicy>().unwrap_or_else(|e| {
                warn!("{}; using default '{}'", e, defaults.midtro_policy);
                defaults.midtro_policy
            }),
            None => defaults.midtro_policy,
        };

        let midtro_max_transitions = match get_setting(pool, "midtro_max_transitions").await? {
            Some(value) => value.parse::<usize>().unwrap_or_else(|e| {
                warn!(
                    "Invalid midtro_max_transitions '{}': {}; using default {}",
                    value, e, defaults.midtro_max_transitions
                );
                defaults.midtro_max_transitions
            }),
            None => defaults.midtro_max_transitions,
        };

        let settings = Self {
            midtro_policy,
            midtro_max_transitions,
        };
        info!(
            "Loaded runtime settings: midtro_policy={}, midtro_max_transitions={}",
            settings.midtro_policy, settings.midtro_max_transitions
        );
        Ok(settings)
    }
}
