use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a pipeline's stages in order, logging progress and, when enabled,
/// process statistics.
pub struct Engine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> Engine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitoring),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting inputs...");
        let raw = self.pipeline.extract().await?;
        self.monitor.log_stats("extract");

        tracing::info!("Compiling...");
        let output = self.pipeline.transform(raw).await?;
        self.monitor.log_stats("transform");

        tracing::info!("Writing artifacts...");
        let output_path = self.pipeline.load(output).await?;
        self.monitor.log_final_stats();

        tracing::info!("Output written to: {}", output_path);
        Ok(output_path)
    }
}
