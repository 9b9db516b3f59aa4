//! Database access layer for bsnd-se
//!
//! The asset repository and the universal fallback audit.

pub mod assets;
pub mod audit;

pub use assets::{
    delete_asset, get_asset, load_assets_by_category, load_assets_for_category, save_asset,
    set_asset_active,
};
pub use audit::{audit_fallbacks, run_fallback_audit, CategoryAudit, FallbackAudit};
