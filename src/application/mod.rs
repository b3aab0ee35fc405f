//! Application layer - use cases and orchestration

pub mod expand;
pub mod manage_config;

pub use expand::{ExpandOptions, ExpandService};
pub use manage_config::ConfigService;
