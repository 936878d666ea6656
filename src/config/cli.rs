use crate::config::{time_limit, validate_io_paths, DEFAULT_TARGET};
use crate::core::constraints::{ConstraintSet, GroupMinimums};
use crate::core::enricher::TimeConversion;
use crate::core::planner::PlanRequest;
use crate::core::search::{SearchSettings, DEFAULT_ITERATIONS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_group_minimums, validate_positive_amount, validate_positive_number, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "offset-planner")]
#[command(about = "Picks carbon-offset projects that capture the most CO2 per year within a budget")]
pub struct CliConfig {
    /// Source file of projects (JSON array)
    #[arg(short, long)]
    pub file: String,

    /// Target file where the report is stored
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Amount of money to be used
    #[arg(short, long)]
    pub money: f64,

    /// Minimum number of continents the projects should be spread over
    #[arg(short = 'c', long, alias = "min_continents", default_value = "1")]
    pub min_continents: usize,

    /// Minimum percentage of the spend going to short term projects
    #[arg(long, alias = "min_short_term_percent", default_value = "0")]
    pub min_short_term_percent: f64,

    /// Minimum percentage of the spend going to medium term projects
    #[arg(long, alias = "min_medium_term_percent", default_value = "0")]
    pub min_medium_term_percent: f64,

    /// Minimum percentage of the spend going to long term projects
    #[arg(long, alias = "min_long_term_percent", default_value = "0")]
    pub min_long_term_percent: f64,

    /// Years covered by the CO2 report, starting with the current one
    #[arg(long, alias = "target_years", default_value = "1", allow_negative_numbers = true)]
    pub target_years: i32,

    /// Number of random selections to try
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u64,

    /// Parallel search shards (defaults to one per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop searching after this many seconds and keep the best so far
    #[arg(long)]
    pub time_limit_secs: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage between phases")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn group_minimums(&self) -> GroupMinimums {
        GroupMinimums::new(
            self.min_short_term_percent,
            self.min_medium_term_percent,
            self.min_long_term_percent,
        )
    }
}

impl ConfigProvider for CliConfig {
    fn source_path(&self) -> &str {
        &self.file
    }

    fn target_path(&self) -> &str {
        &self.target
    }

    fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            money: self.money,
            constraints: ConstraintSet {
                min_continents: self.min_continents,
                group_minimums: self.group_minimums(),
            },
            target_years: Some(self.target_years),
            search: SearchSettings {
                iterations: self.iterations,
                workers: self.workers,
                seed: self.seed,
                time_limit: time_limit(self.time_limit_secs),
            },
            time_units: TimeConversion::default(),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_io_paths(("file", self.file.as_str()), ("target", self.target.as_str()))?;
        validate_positive_amount("money", self.money)?;
        validate_group_minimums("", &self.group_minimums())?;
        validate_positive_number("iterations", self.iterations as usize, 1)?;
        if let Some(workers) = self.workers {
            validate_positive_number("workers", workers, 1)?;
        }
        Ok(())
    }
}
