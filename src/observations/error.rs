use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed KNMI hourly data on line {line}: {message}")]
    Parse { line: usize, message: String },

    // Parsing runs on a blocking task
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
