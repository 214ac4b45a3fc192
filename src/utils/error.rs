use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatusError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dataset page at offset {offset} (length {length}) contained no rows")]
    EmptyPageError { offset: usize, length: usize },

    #[error("Dataset page at offset {offset} (length {length}) is not valid JSON: {source}")]
    DatasetParseError {
        offset: usize,
        length: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Iteration index must start at 1, got {iteration}")]
    InvalidIterationError { iteration: usize },

    #[error("Malformed stream line {line_number}: {source}")]
    StreamLineError {
        line_number: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Chat model reported an error: {message}")]
    ChatError { message: String },

    #[error("Wrote {completed} of {total} records before failure: {source}")]
    PartialRunError {
        completed: usize,
        total: usize,
        #[source]
        source: Box<EtlError>,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Protocol,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(e) if e.is_decode() => ErrorCategory::Protocol,
            EtlError::ApiError(_) => ErrorCategory::Transport,
            EtlError::HttpStatusError { status, .. } if is_retryable_status(*status) => {
                ErrorCategory::Transport
            }
            EtlError::HttpStatusError { .. }
            | EtlError::EmptyPageError { .. }
            | EtlError::DatasetParseError { .. }
            | EtlError::StreamLineError { .. }
            | EtlError::ChatError { .. } => ErrorCategory::Protocol,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Persistence,
            EtlError::UrlError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::InvalidIterationError { .. } => ErrorCategory::Configuration,
            EtlError::PartialRunError { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Protocol | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Persistence => ErrorSeverity::Critical,
        }
    }

    /// 只有連線層級的暫時性錯誤才值得重試
    pub fn is_transient(&self) -> bool {
        match self {
            EtlError::ApiError(e) => e.is_connect() || e.is_timeout(),
            EtlError::HttpStatusError { status, .. } => is_retryable_status(*status),
            EtlError::PartialRunError { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::DatasetParseError { .. } => {
                "Check the dataset endpoint URL; it returned something other than a rows page"
            }
            EtlError::EmptyPageError { .. } => {
                "Check the dataset name, split and offset; the window may be past the end of the split"
            }
            EtlError::StreamLineError { .. } | EtlError::ChatError { .. } => {
                "Check that the chat endpoint speaks the newline-delimited chat protocol and the model is available"
            }
            EtlError::IoError(_) => {
                "Make sure the output file exists and contains a JSON array (for example `[]`)"
            }
            EtlError::SerializationError(_) => {
                "The output file is not a valid JSON array of records; fix or reset it to `[]`"
            }
            EtlError::PartialRunError { source, .. } => source.recovery_suggestion(),
            _ => match self.category() {
                ErrorCategory::Transport => {
                    "Check network connectivity or raise --retry-attempts / --request-timeout-seconds"
                }
                ErrorCategory::Protocol => "Check the endpoint URLs and the remote service status",
                ErrorCategory::Persistence => "Check the output file permissions",
                ErrorCategory::Configuration => "Run with --help to review the available options",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::PartialRunError {
                completed,
                total,
                source,
            } => format!(
                "Wrote {} of {} records before failure. {}",
                completed,
                total,
                source.user_friendly_message()
            ),
            _ => {
                let prefix = match self.category() {
                    ErrorCategory::Transport => "Network problem",
                    ErrorCategory::Protocol => "Unexpected response",
                    ErrorCategory::Persistence => "Output file problem",
                    ErrorCategory::Configuration => "Invalid configuration",
                };
                format!("{}: {}", prefix, self)
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}
