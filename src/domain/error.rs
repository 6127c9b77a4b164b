use thiserror::Error;

use super::model::DownloadMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Provide a valid URL")]
    EmptyUrl,

    #[error("Invalid URL for {}. It must contain '{}'.", .0.description(), .0.url_marker())]
    InvalidForMode(DownloadMode),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Download cancelled")]
    Cancelled,
}
