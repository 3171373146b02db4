use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid source expression: {0}")]
    InvalidSourceExpression(String),

    #[error("Empty allow-list entry: {0}")]
    EmptyAllowListEntry(String),

    #[error("Header processing error: {0}")]
    InvalidHeaderValue(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSourceExpression(_)
            | Self::EmptyAllowListEntry(_)
            | Self::ConfigError(_) => StatusCode::BAD_REQUEST,

            Self::InvalidHeaderValue(_) | Self::SerializationError(_) | Self::RenderError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
