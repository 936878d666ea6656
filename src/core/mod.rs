pub mod aggregator;
pub mod constraints;
pub mod engine;
pub mod enricher;
pub mod planner;
pub mod report;
pub mod search;
pub mod summary;

pub use crate::domain::model::{PlannerReport, Project, ProjectRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RandomSource, Storage};
pub use crate::utils::error::Result;
