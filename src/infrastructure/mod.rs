//! Infrastructure layer - host configuration

pub mod config;

pub use config::Config;
