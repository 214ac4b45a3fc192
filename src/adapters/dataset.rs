use crate::adapters::http::check_status;
use crate::domain::model::{DatasetPage, SourceRow};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::retry::RetryPolicy;
use reqwest::Client;
use url::Url;

/// Reads single rows from a datasets-server style `/rows` endpoint.
pub struct DatasetClient {
    client: Client,
    endpoint: Url,
    dataset: String,
    config: String,
    split: String,
    page_length: Option<usize>,
    lenient_status: bool,
    retry: RetryPolicy,
}

impl DatasetClient {
    pub fn new<C: ConfigProvider>(client: Client, config: &C) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(config.dataset_endpoint())?,
            dataset: config.dataset_name().to_string(),
            config: config.dataset_config().to_string(),
            split: config.dataset_split().to_string(),
            page_length: config.page_length(),
            lenient_status: config.lenient_status(),
            retry: RetryPolicy::new(config.retry_attempts(), config.retry_delay()),
        })
    }

    /// Offset/length window for a 1-based iteration.
    ///
    /// Without a fixed page length the window grows with the iteration
    /// (`offset = i - 1`, `length = i`), which is what existing output files
    /// were produced with. Only the first row of each window is used.
    pub fn window(&self, iteration: usize) -> Result<(usize, usize)> {
        if iteration == 0 {
            return Err(EtlError::InvalidIterationError { iteration });
        }
        let length = self.page_length.unwrap_or(iteration);
        Ok((iteration - 1, length))
    }

    pub fn page_url(&self, iteration: usize) -> Result<Url> {
        let (offset, length) = self.window(iteration)?;
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("dataset", &self.dataset)
            .append_pair("config", &self.config)
            .append_pair("split", &self.split)
            .append_pair("offset", &offset.to_string())
            .append_pair("length", &length.to_string());
        Ok(url)
    }

    pub async fn fetch_page(&self, iteration: usize) -> Result<DatasetPage> {
        let (offset, length) = self.window(iteration)?;
        let url = self.page_url(iteration)?;
        tracing::debug!("Making dataset request to: {}", url);

        self.retry
            .run("dataset fetch", || async {
                let response = self.client.get(url.clone()).send().await?;
                tracing::debug!("Dataset response status: {}", response.status());

                let response = check_status(response, self.lenient_status).await?;
                let body = response.bytes().await?;
                serde_json::from_slice::<DatasetPage>(&body).map_err(|source| {
                    EtlError::DatasetParseError {
                        offset,
                        length,
                        source,
                    }
                })
            })
            .await
    }

    pub async fn fetch_row(&self, iteration: usize) -> Result<SourceRow> {
        let (offset, length) = self.window(iteration)?;
        let page = self.fetch_page(iteration).await?;

        tracing::debug!(
            "Page has {} rows ({} total, {} per page, partial: {})",
            page.rows.len(),
            page.num_rows_total,
            page.num_rows_per_page,
            page.partial
        );

        page.rows
            .into_iter()
            .next()
            .map(|page_row| page_row.row)
            .ok_or(EtlError::EmptyPageError { offset, length })
    }
}
