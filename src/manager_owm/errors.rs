use std::fmt;

/// Errors from the OpenWeatherMap API family.
///
/// The lookup errors (`NotFound`, `Auth`, `RateLimit`) identify failures
/// that make the requested city impossible to resolve and are surfaced to
/// the caller, while `Upstream` and `Document` typically get absorbed into
/// synthetic fallback data by the dashboard manager.
#[derive(Debug)]
pub enum OwmError {
    NotFound(String),
    Auth,
    RateLimit,
    Upstream(String),
    Document(String),
}

impl fmt::Display for OwmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OwmError::NotFound(e) => write!(f, "OwmError::NotFound: {}", e),
            OwmError::Auth => write!(f, "OwmError::Auth: invalid or missing API key"),
            OwmError::RateLimit => write!(f, "OwmError::RateLimit: API quota exceeded"),
            OwmError::Upstream(e) => write!(f, "OwmError::Upstream: {}", e),
            OwmError::Document(e) => write!(f, "OwmError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for OwmError {
    fn from(e: reqwest::Error) -> Self {
        OwmError::Upstream(e.to_string())
    }
}
impl From<serde_json::Error> for OwmError {
    fn from(e: serde_json::Error) -> Self {
        OwmError::Document(e.to_string())
    }
}
