//! Per-instance configuration of a [`Geocoder`](../blocking/struct.Geocoder.html).
//!
//! ```
//! use geokit::{FailurePolicy, GeocoderConfig};
//! use std::time::Duration;
//!
//! let config = GeocoderConfig::new()
//!     .with_timeout(Duration::from_secs(3))
//!     .with_failure_policy(FailurePolicy::Absorb);
//! assert_eq!(config.timeout, Duration::from_secs(3));
//! assert!(config.unwrap_array);
//! ```
use crate::DEFAULT_TIMEOUT;
use std::time::Duration;

/// How transport and decode failures are reported to the caller
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report `Request`, `Status` and `Decode` errors as they happened
    Surface,
    /// Swallow every failure, so that the caller only ever sees `NoResult`
    Absorb,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Surface
    }
}

#[derive(Copy, Clone, Debug)]
pub struct GeocoderConfig {
    /// Wall-clock budget of one round trip, including the body read and decode
    pub timeout: Duration,
    /// Strip surrounding spaces and square brackets from the body before decoding,
    /// so that providers answering with `[{...}]` decode like `{...}`
    pub unwrap_array: bool,
    pub failure_policy: FailurePolicy,
}

impl GeocoderConfig {
    pub fn new() -> Self {
        GeocoderConfig::default()
    }

    /// Set a custom timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the array unwrapping of response bodies
    pub fn with_unwrap_array(mut self, unwrap_array: bool) -> Self {
        self.unwrap_array = unwrap_array;
        self
    }

    /// Set the [`FailurePolicy`](enum.FailurePolicy.html)
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            timeout: DEFAULT_TIMEOUT,
            unwrap_array: true,
            failure_policy: FailurePolicy::default(),
        }
    }
}
