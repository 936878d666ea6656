use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct PlannerEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PlannerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting offset planning...");
        self.monitor.log_phase("Start");

        tracing::info!("Reading projects...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Read {} project records", records.len());
        self.monitor.log_phase("Extract");

        tracing::info!("Searching for the best selection...");
        let outcome = self.pipeline.transform(records).await?;
        outcome.summary.log();
        self.monitor.log_phase("Search");

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Report written to {}", output_path);
        self.monitor.log_phase("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
