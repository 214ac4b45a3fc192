use serde::{Deserialize, Serialize};

/// One dataset row as served by the rows endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub id: String,
    pub system_prompt: String,
    pub question: String,
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureType {
    #[serde(default)]
    pub dtype: Option<String>,
    #[serde(rename = "_type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub feature_idx: usize,
    pub name: String,
    #[serde(rename = "type", default)]
    pub feature_type: FeatureType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
    #[serde(default)]
    pub row_idx: usize,
    pub row: SourceRow,
    #[serde(default)]
    pub truncated_cells: Vec<serde_json::Value>,
}

/// 分頁回應；除了 `rows` 之外的欄位都只是資訊性質
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPage {
    #[serde(default)]
    pub features: Vec<Feature>,
    pub rows: Vec<PageRow>,
    #[serde(default)]
    pub num_rows_total: usize,
    #[serde(default)]
    pub num_rows_per_page: usize,
    #[serde(default)]
    pub partial: bool,
}

/// Output shape appended to the JSON array file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub instruction: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    #[default]
    Assistant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// One line of the newline-delimited chat stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub message: ChatMessage,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
