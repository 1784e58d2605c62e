use thiserror::Error;

/// Errors raised while bootstrapping the relay process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load configuration {path}: {detail}")]
    Config { path: String, detail: anyhow::Error },
    #[error("Failed to initialize logging from {path}: {detail}")]
    Logging { path: String, detail: anyhow::Error },
    #[error("Invalid CORS header value: {0}")]
    Header(#[from] actix_web::http::header::InvalidHeaderValue),
}

impl From<AppError> for std::io::Error {
    fn from(err: AppError) -> std::io::Error {
        match err {
            AppError::Io(e) => e,
            AppError::Header(e) => std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
