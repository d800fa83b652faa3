use crate::db::StoreError;

/// Message shown to the user for every failed feed, whatever the cause
pub const GENERIC_ERROR_MESSAGE: &str = "Please refresh the page.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Catalog API returned status {status}: {message}")]
    ExternalApi { status: u16, message: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The only text a feed ever shows for this error.
    ///
    /// Not-found, network down and bad ids all collapse to the same message;
    /// the detailed error is meant for the log.
    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }
}

pub type AppResult<T> = Result<T, AppError>;
