//! HTTP API handlers for bsnd-se

pub mod audit;
pub mod buildinfo;
pub mod health;
pub mod select;

pub use audit::get_fallback_audit;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use select::select_sounds;
