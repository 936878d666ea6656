use crate::core::planner::{PlanOutcome, PlanRequest};
use crate::domain::model::ProjectRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_path(&self) -> &str;
    fn target_path(&self) -> &str;
    fn plan_request(&self) -> PlanRequest;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ProjectRecord>>;
    async fn transform(&self, records: Vec<ProjectRecord>) -> Result<PlanOutcome>;
    async fn load(&self, outcome: PlanOutcome) -> Result<String>;
}

pub trait RandomSource {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn next_index(&mut self, len: usize) -> usize;
}
