//! # bsnd Common Library
//!
//! Shared code for the briefing sound services including:
//! - Sound asset data model (categories, conditions, time-of-day buckets)
//! - Database initialization
//! - Bootstrap configuration loading
//! - Wall-clock helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use db::models::{SoundAsset, SoundCategory, SoundConditions, TimeOfDay};
pub use error::{Error, Result};
