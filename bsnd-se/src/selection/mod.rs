//! Sound asset selection engine
//!
//! Pure functions over borrowed candidate lists. Nothing in this module
//! performs I/O, logs, or keeps state between calls; randomness is injected
//! by the caller through [`RandomSource`].
//!
//! Selection for one category:
//! 1. eligibility filter (active, every condition axis satisfied)
//! 2. keep the candidates sharing the maximum priority
//! 3. uniform random tie-break among them
//!
//! "No match" is `None`, never an error.

mod batch;
mod context;
mod eligibility;
mod engine;
mod random;

pub use batch::{select_all_sounds, select_categories, select_midtros, MidtroPolicy, SoundBundle};
pub use context::PlaybackContext;
pub use eligibility::is_eligible;
pub use engine::{eligible_candidates, select_asset, top_priority};
pub use random::{FixedSource, RandomSource, RngSource};

use thiserror::Error;

/// Errors raised by context validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// Playback context carries values no briefing can have
    #[error("Invalid playback context: {0}")]
    InvalidContext(String),
}
