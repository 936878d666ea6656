pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, TomlConfig};

pub use app::pipelines::OffsetPipeline;
pub use core::engine::PlannerEngine;
pub use core::planner::{plan_offsets, PlanOutcome, PlanRequest};
pub use utils::error::{PlannerError, Result};
