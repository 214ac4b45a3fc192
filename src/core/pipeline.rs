use crate::adapters::http::build_client;
use crate::adapters::{ChatTranslator, DatasetClient, JsonArrayStore};
use crate::core::{ConfigProvider, Pipeline, SourceRow, Storage, TranslationRecord};
use crate::utils::error::Result;

pub struct TranslationPipeline<S: Storage> {
    dataset: DatasetClient,
    translator: ChatTranslator,
    store: JsonArrayStore<S>,
    output_path: String,
}

impl<S: Storage> TranslationPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Result<Self> {
        let client = build_client(config.request_timeout())?;

        Ok(Self {
            dataset: DatasetClient::new(client.clone(), config)?,
            translator: ChatTranslator::new(client, config)?,
            store: JsonArrayStore::new(storage, config.output_file()),
            output_path: config.output_path().to_string(),
        })
    }

    pub fn dataset(&self) -> &DatasetClient {
        &self.dataset
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TranslationPipeline<S> {
    async fn extract(&self, iteration: usize) -> Result<SourceRow> {
        let row = self.dataset.fetch_row(iteration).await?;
        tracing::debug!("Fetched row {}", row.id);
        Ok(row)
    }

    async fn transform(&self, row: SourceRow) -> Result<TranslationRecord> {
        // 依序翻譯，三個欄位各自一次請求
        let instruction = self.translator.translate(&row.system_prompt).await?;
        let input = self.translator.translate(&row.question).await?;
        let output = self.translator.translate(&row.response).await?;

        Ok(TranslationRecord {
            instruction,
            input,
            output,
        })
    }

    async fn load(&self, record: TranslationRecord) -> Result<usize> {
        self.store.append(record).await
    }

    async fn record_count(&self) -> Result<usize> {
        self.store.len().await
    }

    fn output_location(&self) -> String {
        format!("{}/{}", self.output_path, self.store.file_name())
    }
}
