use crate::core::planner::{plan_offsets, PlanOutcome};
use crate::core::{ConfigProvider, Pipeline, ProjectRecord, Storage};
use crate::utils::error::{PlannerError, Result};

/// Reads projects from a JSON file, plans the purchase and writes the
/// report as pretty JSON.
pub struct OffsetPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OffsetPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OffsetPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ProjectRecord>> {
        let source = self.config.source_path();
        tracing::debug!("Reading projects from: {}", source);

        let bytes = self.storage.read_file(source).await?;
        let records: Vec<ProjectRecord> = serde_json::from_slice(&bytes)?;

        if records.is_empty() {
            return Err(PlannerError::EmptyInput);
        }

        Ok(records)
    }

    async fn transform(&self, records: Vec<ProjectRecord>) -> Result<PlanOutcome> {
        let request = self.config.plan_request();
        tracing::debug!("Plan request: {:?}", request);

        // The search is CPU bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || plan_offsets(&records, &request))
            .await
            .map_err(|e| PlannerError::ProcessingError {
                message: format!("planning task failed: {}", e),
            })?
    }

    async fn load(&self, outcome: PlanOutcome) -> Result<String> {
        let target = self.config.target_path();
        let json = serde_json::to_string_pretty(&outcome.report)?;

        tracing::debug!("Writing report ({} bytes) to {}", json.len(), target);
        self.storage.write_file(target, json.as_bytes()).await?;

        Ok(target.to_string())
    }
}
