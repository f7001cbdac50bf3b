pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{BriefSettings, Credentials};
pub use crate::core::{
    engine::BriefEngine,
    pipeline::{BriefPipeline, HttpPipeline},
};
pub use crate::utils::error::{BriefError, Result};
