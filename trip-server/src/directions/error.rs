//! Directions adapter error types.

use std::fmt;

/// Errors from geocoding or directions lookups.
#[derive(Debug)]
pub enum DirectionsError {
    /// No place matching the query inside the region
    PlaceNotResolved(String),

    /// The service found no drivable route between the two places
    NoRoute,

    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization or conversion failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status
    ApiError { status: u16, message: String },

    /// Invalid API key or request denied
    Unauthorized,

    /// Rate limited by the API
    RateLimited,

    /// Feature not configured or not available
    NotConfigured(String),
}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsError::PlaceNotResolved(query) => {
                write!(f, "no place found for {query:?}")
            }
            DirectionsError::NoRoute => write!(f, "no driving route between locations"),
            DirectionsError::Http(e) => write!(f, "HTTP error: {e}"),
            DirectionsError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DirectionsError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DirectionsError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            DirectionsError::RateLimited => write!(f, "rate limited by directions API"),
            DirectionsError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for DirectionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectionsError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        DirectionsError::Http(err)
    }
}
