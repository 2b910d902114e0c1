use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Ticket {id} not found")]
    TicketNotFound { id: u64 },
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// 從生成器輸出中擷取 JSON 時的錯誤
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no JSON object found in generator output")]
    NoPayloadFound,

    #[error("generator output contains malformed JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid generator output: {0}")]
    InvalidGeneratorOutput(#[from] ExtractionError),
}

/// 文字生成器 (Gemini) 呼叫錯誤
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator configuration error: {0}")]
    Config(String),

    #[error("Generator request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generator API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generator response parse error: {0}")]
    Parse(String),

    #[error("Generator returned no text")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Content generation service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("Content generation failed: {source}")]
    GenerationFailed {
        #[source]
        source: GenerationFailure,
    },
}

/// `GenerationFailed` 的內部原因，只寫入日誌，不回傳給呼叫端
#[derive(Error, Debug)]
pub enum GenerationFailure {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ServiceError {
    /// HTTP 層使用的狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidRequest { .. } => 400,
            ServiceError::ServiceUnavailable { .. } | ServiceError::GenerationFailed { .. } => 500,
        }
    }

    /// 對外顯示的訊息，不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::InvalidRequest { message } => message.clone(),
            ServiceError::ServiceUnavailable { .. } => {
                "The content generator is not initialized".to_string()
            }
            ServiceError::GenerationFailed {
                source:
                    GenerationFailure::Pipeline(PipelineError::InvalidGeneratorOutput(
                        ExtractionError::NoPayloadFound,
                    )),
            } => "Could not obtain a valid JSON response from the generator".to_string(),
            ServiceError::GenerationFailed {
                source:
                    GenerationFailure::Pipeline(PipelineError::InvalidGeneratorOutput(
                        ExtractionError::MalformedPayload(_),
                    )),
            } => "The generator responded with an invalid JSON format".to_string(),
            ServiceError::GenerationFailed { .. } => {
                "An error occurred on the server while generating content".to_string()
            }
        }
    }

    pub fn response_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.user_friendly_message() })
    }
}

impl From<GeneratorError> for ServiceError {
    fn from(err: GeneratorError) -> Self {
        ServiceError::GenerationFailed {
            source: GenerationFailure::Generator(err),
        }
    }
}

impl From<PipelineError> for ServiceError {
    fn from(err: PipelineError) -> Self {
        ServiceError::GenerationFailed {
            source: GenerationFailure::Pipeline(err),
        }
    }
}
