pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "orca-translate")]
#[command(about = "Translate dataset rows through a chat model into a JSON array file")]
pub struct CliConfig {
    #[arg(long, default_value = "https://datasets-server.huggingface.co/rows")]
    pub dataset_endpoint: String,

    #[arg(long, default_value = "Open-Orca/OpenOrca")]
    pub dataset: String,

    #[arg(long, default_value = "default")]
    pub dataset_config: String,

    #[arg(long, default_value = "train")]
    pub split: String,

    /// Fixed rows per request; unset keeps the growing (i-1, i) window
    #[arg(long)]
    pub page_length: Option<usize>,

    #[arg(long, default_value = "http://localhost:11434/api/chat")]
    pub chat_endpoint: String,

    #[arg(long, default_value = "llama3:70b-instruct-fp16")]
    pub model: String,

    #[arg(long, default_value = "Turkish")]
    pub target_language: String,

    #[arg(long, default_value = "4")]
    pub iterations: usize,

    /// Directory holding the output file
    #[arg(long, default_value = ".")]
    pub output_path: String,

    /// Existing JSON array file that records are appended to
    #[arg(long, default_value = "gpt4.json")]
    pub output_file: String,

    #[arg(long, default_value = "120")]
    pub request_timeout_seconds: u64,

    #[arg(long, default_value = "0")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "2")]
    pub retry_delay_seconds: u64,

    #[arg(long, help = "Parse response bodies even when the status is not 2xx")]
    pub lenient_status: bool,

    #[arg(long, help = "Print the dataset URLs that would be requested and exit")]
    pub dry_run: bool,

    /// TOML file whose values take precedence over flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("dataset_endpoint", &self.dataset_endpoint)?;
        validate_url("chat_endpoint", &self.chat_endpoint)?;
        validate_non_empty_string("dataset", &self.dataset)?;
        validate_non_empty_string("model", &self.model)?;
        validate_non_empty_string("target_language", &self.target_language)?;
        validate_positive_number("iterations", self.iterations, 1)?;
        if let Some(length) = self.page_length {
            validate_positive_number("page_length", length, 1)?;
        }
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;
        validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 3600)?;
        validate_range("retry_attempts", self.retry_attempts, 0, 10)?;
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn dataset_endpoint(&self) -> &str {
        &self.dataset_endpoint
    }

    fn dataset_name(&self) -> &str {
        &self.dataset
    }

    fn dataset_config(&self) -> &str {
        &self.dataset_config
    }

    fn dataset_split(&self) -> &str {
        &self.split
    }

    fn page_length(&self) -> Option<usize> {
        self.page_length
    }

    fn chat_endpoint(&self) -> &str {
        &self.chat_endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    fn lenient_status(&self) -> bool {
        self.lenient_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_gpt4_json_run() {
        let config = CliConfig::parse_from(["orca-translate"]);

        assert_eq!(config.dataset, "Open-Orca/OpenOrca");
        assert_eq!(config.dataset_config, "default");
        assert_eq!(config.split, "train");
        assert_eq!(config.page_length, None);
        assert_eq!(config.model, "llama3:70b-instruct-fp16");
        assert_eq!(config.target_language, "Turkish");
        assert_eq!(config.iterations, 4);
        assert_eq!(config.output_file, "gpt4.json");
        assert_eq!(config.retry_attempts, 0);
        assert!(!config.lenient_status);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_iterations = CliConfig::parse_from(["orca-translate", "--iterations", "0"]);
        assert!(zero_iterations.validate().is_err());

        let bad_endpoint =
            CliConfig::parse_from(["orca-translate", "--chat-endpoint", "localhost:11434"]);
        assert!(bad_endpoint.validate().is_err());

        let zero_page = CliConfig::parse_from(["orca-translate", "--page-length", "0"]);
        assert!(zero_page.validate().is_err());

        let blank_language = CliConfig::parse_from(["orca-translate", "--target-language", " "]);
        assert!(blank_language.validate().is_err());
    }

    #[test]
    fn test_durations() {
        let config = CliConfig::parse_from([
            "orca-translate",
            "--request-timeout-seconds",
            "30",
            "--retry-delay-seconds",
            "5",
        ]);

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
    }
}
