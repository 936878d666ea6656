use crate::config::{time_limit, validate_io_paths, DEFAULT_TARGET};
use crate::core::constraints::{ConstraintSet, GroupMinimums};
use crate::core::enricher::TimeConversion;
use crate::core::planner::PlanRequest;
use crate::core::search::{SearchSettings, DEFAULT_ITERATIONS};
use crate::core::ConfigProvider;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{
    validate_group_minimums, validate_positive_amount, validate_positive_number,
    validate_required_field, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub constraints: ConstraintsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub target: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub money: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintsConfig {
    #[serde(default = "default_min_continents")]
    pub min_continents: usize,
    #[serde(default)]
    pub min_short_term_percent: f64,
    #[serde(default)]
    pub min_medium_term_percent: f64,
    #[serde(default)]
    pub min_long_term_percent: f64,
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            min_continents: default_min_continents(),
            min_short_term_percent: 0.0,
            min_medium_term_percent: 0.0,
            min_long_term_percent: 0.0,
        }
    }
}

fn default_min_continents() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub target_years: Option<i32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_years: Some(1),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub iterations: Option<u64>,
    pub workers: Option<usize>,
    pub seed: Option<u64>,
    pub time_limit_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_io_paths(
            ("input.file", self.input.file.as_str()),
            ("output.target", self.output.target.as_str()),
        )?;
        let money = validate_required_field("budget.money", &self.budget.money)?;
        validate_positive_amount("budget.money", *money)?;
        validate_group_minimums("constraints.", &self.group_minimums())?;

        if let Some(iterations) = self.search.iterations {
            validate_positive_number("search.iterations", iterations as usize, 1)?;
        }
        if let Some(workers) = self.search.workers {
            validate_positive_number("search.workers", workers, 1)?;
        }

        Ok(())
    }

    pub fn group_minimums(&self) -> GroupMinimums {
        GroupMinimums::new(
            self.constraints.min_short_term_percent,
            self.constraints.min_medium_term_percent,
            self.constraints.min_long_term_percent,
        )
    }

    /// Budget for the run; 0 until validation has checked it is set.
    pub fn money(&self) -> f64 {
        self.budget.money.unwrap_or(0.0)
    }

    pub fn iterations(&self) -> u64 {
        self.search.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> &str {
        &self.input.file
    }

    fn target_path(&self) -> &str {
        &self.output.target
    }

    fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            money: self.money(),
            constraints: ConstraintSet {
                min_continents: self.constraints.min_continents,
                group_minimums: self.group_minimums(),
            },
            target_years: self.report.target_years,
            search: SearchSettings {
                iterations: self.iterations(),
                workers: self.search.workers,
                seed: self.search.seed,
                time_limit: time_limit(self.search.time_limit_secs),
            },
            time_units: TimeConversion::default(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_toml_config() {
        let toml_content = r#"
[input]
file = "projects.json"

[budget]
money = 1500.0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output.target, "./data/output.json");
        assert_eq!(config.constraints.min_continents, 1);
        assert_eq!(config.report.target_years, Some(1));
        assert_eq!(config.iterations(), DEFAULT_ITERATIONS);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[input]
file = "projects.json"

[output]
target = "reports/plan.json"

[budget]
money = 1500.0

[constraints]
min_continents = 3
min_short_term_percent = 10
min_long_term_percent = 25.5

[report]
target_years = 5

[search]
iterations = 1000
workers = 2
seed = 42
time_limit_secs = 30

[monitoring]
enabled = true
json_logs = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let request = config.plan_request();

        assert_eq!(request.money, 1500.0);
        assert_eq!(request.constraints.min_continents, 3);
        assert_eq!(
            request.constraints.group_minimums,
            GroupMinimums::new(10.0, 0.0, 25.5)
        );
        assert_eq!(request.target_years, Some(5));
        assert_eq!(request.search.iterations, 1000);
        assert_eq!(request.search.workers, Some(2));
        assert_eq!(request.search.seed, Some(42));
        assert_eq!(request.search.time_limit, Some(Duration::from_secs(30)));
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("OFFSET_PLANNER_TEST_SOURCE", "from_env.json");

        let toml_content = r#"
[input]
file = "${OFFSET_PLANNER_TEST_SOURCE}"

[budget]
money = 10
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.file, "from_env.json");

        std::env::remove_var("OFFSET_PLANNER_TEST_SOURCE");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[input]
file = "projects.json"

[budget]
money = -5

[constraints]
min_short_term_percent = 70
min_medium_term_percent = 70
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_budget_is_reported_by_name() {
        let toml_content = r#"
[input]
file = "projects.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        match config.validate() {
            Err(PlannerError::MissingConfigError { field }) => assert_eq!(field, "budget.money"),
            other => panic!("expected MissingConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_is_a_parse_error() {
        let toml_content = r#"
[budget]
money = 10
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(PlannerError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[input]
file = "projects.json"

[budget]
money = 99.5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.budget.money, Some(99.5));
    }
}
