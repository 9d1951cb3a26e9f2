use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during geocoding operations
#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("Geocoding request timed out")]
    Timeout,
    #[error("No result returned")]
    NoResult,
    #[error("HTTP request error")]
    Request(#[source] reqwest::Error),
    #[error("Provider answered with status {0}")]
    Status(StatusCode),
    #[error("Error decoding the provider response")]
    Decode(#[from] serde_json::Error),
}

impl GeocodingError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeocodingError::Timeout)
    }

    pub fn is_no_result(&self) -> bool {
        matches!(self, GeocodingError::NoResult)
    }
}

/// A client-side timeout is the same event as the geocoder running out of
/// time, whichever timer fires first.
impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodingError::Timeout
        } else {
            GeocodingError::Request(err)
        }
    }
}
