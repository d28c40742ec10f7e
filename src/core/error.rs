use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Message used when the server gave us nothing we could decode.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Error envelope returned by the API: `{"error": {...}}`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Human readable message plus whatever metadata the server attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    pub message: String,
    pub metadata: Option<Map<String, Value>>,
}

impl ApiErrorDetail {
    pub fn unknown() -> Self {
        Self {
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
            metadata: None,
        }
    }
}

impl From<Option<ErrorResponse>> for ApiErrorDetail {
    fn from(body: Option<ErrorResponse>) -> Self {
        match body {
            Some(ErrorResponse { error }) => Self {
                message: error.message,
                metadata: error.metadata,
            },
            None => Self::unknown(),
        }
    }
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenRouterError {
    /// 400
    #[error("Bad request: {0}")]
    BadRequest(ApiErrorDetail),
    /// 401
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(ApiErrorDetail),
    /// 402
    #[error("Insufficient credits: {0}")]
    InsufficientCredits(ApiErrorDetail),
    /// 403, the input was flagged by moderation
    #[error("Moderation error: {0}")]
    ModerationError(ApiErrorDetail),
    /// 408
    #[error("Request timed out: {0}")]
    RequestTimeout(ApiErrorDetail),
    /// 429
    #[error("Rate limited: {0}")]
    RateLimited(ApiErrorDetail),
    /// 502, the chosen model is down or returned an invalid response
    #[error("Model down: {0}")]
    ModelDown(ApiErrorDetail),
    /// 503, no provider satisfies the routing requirements
    #[error("No available provider: {0}")]
    NoAvailableProvider(ApiErrorDetail),
    /// Any other status code
    #[error("Unknown error (status {code}): {detail}")]
    UnknownError { code: u16, detail: ApiErrorDetail },
    /// Base URL plus path did not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// A configured header value is not a legal HTTP header
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
    /// The request body could not be encoded; nothing was sent
    #[error("Failed to serialize request body: {0}")]
    Serialization(serde_json::Error),
    /// The connection failed or the server sent a malformed response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A value did not match any variant of a union type
    #[error("Decoding error: {0}")]
    Decoding(String),
    /// Streaming read failed. Logged, never yielded to a stream consumer.
    #[error("Streaming failure: {0}")]
    StreamingFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IOError(String),
}

impl OpenRouterError {
    /// Maps a status code and an optional decoded error body onto the taxonomy.
    pub fn classify(status: u16, body: Option<ErrorResponse>) -> Self {
        let detail = ApiErrorDetail::from(body);
        match status {
            400 => Self::BadRequest(detail),
            401 => Self::InvalidCredentials(detail),
            402 => Self::InsufficientCredits(detail),
            403 => Self::ModerationError(detail),
            408 => Self::RequestTimeout(detail),
            429 => Self::RateLimited(detail),
            502 => Self::ModelDown(detail),
            503 => Self::NoAvailableProvider(detail),
            code => Self::UnknownError { code, detail },
        }
    }

    /// HTTP status for classified errors, `None` for everything else.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::InvalidCredentials(_) => Some(401),
            Self::InsufficientCredits(_) => Some(402),
            Self::ModerationError(_) => Some(403),
            Self::RequestTimeout(_) => Some(408),
            Self::RateLimited(_) => Some(429),
            Self::ModelDown(_) => Some(502),
            Self::NoAvailableProvider(_) => Some(503),
            Self::UnknownError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub const fn detail(&self) -> Option<&ApiErrorDetail> {
        match self {
            Self::BadRequest(detail)
            | Self::InvalidCredentials(detail)
            | Self::InsufficientCredits(detail)
            | Self::ModerationError(detail)
            | Self::RequestTimeout(detail)
            | Self::RateLimited(detail)
            | Self::ModelDown(detail)
            | Self::NoAvailableProvider(detail)
            | Self::UnknownError { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OpenRouterError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err.to_string())
    }
}

impl From<config::ConfigError> for OpenRouterError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Best-effort decode of an error envelope; `None` if the bytes are anything else.
pub fn decode_error_body(bytes: &[u8]) -> Option<ErrorResponse> {
    serde_json::from_slice(bytes).ok()
}
