#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub use toml_config::TomlConfig;

use crate::utils::validation::{validate_file_extensions, validate_path};
use crate::utils::error::{PlannerError, Result};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TARGET: &str = "./data/output.json";

/// Source must be a JSON file and the target a usable path.
pub(crate) fn validate_io_paths(
    (source_field, source): (&str, &str),
    (target_field, target): (&str, &str),
) -> Result<()> {
    validate_path(source_field, source)?;
    validate_file_extensions(source_field, &[source.to_string()], &["json"])?;
    validate_path(target_field, target)?;

    if Path::new(source) == Path::new(target) {
        return Err(PlannerError::ConfigError {
            message: format!(
                "'{}' and '{}' both point to {}; the report would overwrite the projects",
                source_field, target_field, source
            ),
        });
    }
    Ok(())
}

pub(crate) fn time_limit(seconds: Option<u64>) -> Option<Duration> {
    seconds.map(Duration::from_secs)
}

/// Storage keyed by plain paths; relative paths resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn current_dir() -> Self {
        Self::new(".".to_string())
    }

    fn resolve(&self, path: &str) -> std::path::PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl crate::core::Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
