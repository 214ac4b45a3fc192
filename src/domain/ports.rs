use crate::domain::model::{SourceRow, TranslationRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_endpoint(&self) -> &str;
    fn dataset_name(&self) -> &str;
    fn dataset_config(&self) -> &str;
    fn dataset_split(&self) -> &str;
    fn page_length(&self) -> Option<usize>;
    fn chat_endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn target_language(&self) -> &str;
    fn iterations(&self) -> usize;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn lenient_status(&self) -> bool;
}

/// One iteration is `extract` → `transform` → `load`.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, iteration: usize) -> Result<SourceRow>;
    async fn transform(&self, row: SourceRow) -> Result<TranslationRecord>;
    /// Returns the number of records in the output after the append.
    async fn load(&self, record: TranslationRecord) -> Result<usize>;
    /// Records currently in the output, read without modifying it.
    async fn record_count(&self) -> Result<usize>;
    fn output_location(&self) -> String;
}
