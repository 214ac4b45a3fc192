use crate::config::CliConfig;
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional file-based configuration. Every key is optional; keys present in
/// the file override the corresponding flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub dataset: DatasetSection,
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub run: RunSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSection {
    pub endpoint: Option<String>,
    pub name: Option<String>,
    pub config: Option<String>,
    pub split: Option<String>,
    pub page_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatSection {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub path: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    pub iterations: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub lenient_status: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read config file {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHAT_HOST})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_to(&self, config: &mut CliConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.dataset_endpoint, &self.dataset.endpoint);
        set(&mut config.dataset, &self.dataset.name);
        set(&mut config.dataset_config, &self.dataset.config);
        set(&mut config.split, &self.dataset.split);
        if self.dataset.page_length.is_some() {
            config.page_length = self.dataset.page_length;
        }

        set(&mut config.chat_endpoint, &self.chat.endpoint);
        set(&mut config.model, &self.chat.model);
        set(&mut config.target_language, &self.chat.target_language);

        set(&mut config.output_path, &self.output.path);
        set(&mut config.output_file, &self.output.file);

        set(&mut config.iterations, &self.run.iterations);
        set(
            &mut config.request_timeout_seconds,
            &self.run.request_timeout_seconds,
        );
        set(&mut config.retry_attempts, &self.run.retry_attempts);
        set(&mut config.retry_delay_seconds, &self.run.retry_delay_seconds);
        set(&mut config.lenient_status, &self.run.lenient_status);
    }
}
