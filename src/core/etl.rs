use crate::core::Pipeline;
use crate::utils::error::{EtlError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations_completed: usize,
    pub records_in_file: usize,
    pub output_location: String,
}

/// Runs a fixed number of fetch → translate → append iterations, strictly in
/// sequence. The first error stops the run.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    iterations: usize,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, iterations: usize) -> Self {
        Self {
            pipeline,
            iterations,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting translation run: {} iterations", self.iterations);

        // 只做紀錄；檔案問題留到第一次附加時回報
        match self.pipeline.record_count().await {
            Ok(count) => tracing::info!(
                "{} already holds {} records",
                self.pipeline.output_location(),
                count
            ),
            Err(e) => tracing::warn!(
                "Cannot read {} before run: {}",
                self.pipeline.output_location(),
                e
            ),
        }

        let mut records_in_file = 0;
        for iteration in 1..=self.iterations {
            records_in_file = self
                .run_iteration(iteration)
                .await
                .map_err(|e| EtlError::PartialRunError {
                    completed: iteration - 1,
                    total: self.iterations,
                    source: Box::new(e),
                })?;
        }

        Ok(RunSummary {
            iterations_completed: self.iterations,
            records_in_file,
            output_location: self.pipeline.output_location(),
        })
    }

    async fn run_iteration(&self, iteration: usize) -> Result<usize> {
        // Extract
        tracing::info!("Get text {}", iteration);
        let row = self.pipeline.extract(iteration).await?;

        // Transform
        tracing::info!("Translating row {}", row.id);
        let record = self.pipeline.transform(row).await?;

        // Load
        let records_in_file = self.pipeline.load(record).await?;
        tracing::info!(
            "Appended record {}/{} ({} in file)",
            iteration,
            self.iterations,
            records_in_file
        );

        Ok(records_in_file)
    }
}
