use thiserror::Error;

/// Errors from the TMDB API client.
///
/// All of these are transient from the session's point of view: the
/// call yielded no data, state is left as it was, and the next user
/// action is the retry path.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}
