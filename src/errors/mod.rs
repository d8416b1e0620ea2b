use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteSearchError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Source errors
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Response parsing failed: {0}")]
    ResponseParse(#[from] serde_json::Error),

    // Session errors
    #[error("Fetch session {0} was superseded by a newer session")]
    SessionSuperseded(u64),

    #[error("Session state unavailable: {0}")]
    SessionLock(String),

    // Export errors
    #[error("Export failed: {0}")]
    Export(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type NoteSearchResult<T> = Result<T, NoteSearchError>;
