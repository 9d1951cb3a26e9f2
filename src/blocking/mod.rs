//! The blocking geocoder, running each round trip on a worker thread.
//!
//! ### Example
//!
//! ```no_run
//! use geokit::blocking::Geocoder;
//! use geokit::parser::{decode_json, non_empty, ResponseParser};
//! use geokit::{EndpointBuilder, GeocodingError, Location};
//! use serde::Deserialize;
//!
//! struct Fake;
//!
//! impl EndpointBuilder for Fake {
//!     fn geocode_url(&self, address: &str) -> String {
//!         geokit::endpoint::with_query("http://fake/geocode", &[("q", address)])
//!     }
//!
//!     fn reverse_geocode_url(&self, location: &Location) -> String {
//!         format!("http://fake/reverse?latlng={}", location)
//!     }
//! }
//!
//! #[derive(Default, Deserialize)]
//! #[serde(default)]
//! struct FakeParser {
//!     lat: f64,
//!     lng: f64,
//!     address: String,
//! }
//!
//! impl ResponseParser for FakeParser {
//!     fn decode(&mut self, payload: &[u8]) -> Result<(), GeocodingError> {
//!         *self = decode_json(payload)?;
//!         Ok(())
//!     }
//!
//!     fn location(&self) -> Option<Location> {
//!         Location::new(self.lat, self.lng).non_zero()
//!     }
//!
//!     fn address(&self) -> Option<String> {
//!         non_empty(self.address.clone())
//!     }
//!
//!     fn fresh(&self) -> Self {
//!         FakeParser::default()
//!     }
//! }
//!
//! let geocoder = Geocoder::new(Fake, FakeParser::default());
//! let paris = geocoder.geocode("Paris").unwrap();
//! ```
mod geocoder;

pub use self::geocoder::Geocoder;

use crate::{GeocodingError, HeaderMap, HeaderValue, UA_STRING, USER_AGENT};
use std::time::Duration;

/// Issue a GET request and return the full response body.
///
/// The transport is shared by every request of a `Geocoder` and used from
/// its worker threads.
pub trait Transport: Send + Sync + 'static {
    // NOTE TO IMPLEMENTERS: non-success status codes must be reported as
    // errors, otherwise error pages end up in the response parser
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GeocodingError>;
}

impl Transport for reqwest::blocking::Client {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, GeocodingError> {
        let resp = self.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status));
        }
        Ok(resp.bytes()?.to_vec())
    }
}

/// The default transport.
///
/// The client gives up after `timeout`, so a worker abandoned by the
/// geocoder does not hold its connection longer than the caller waited.
/// When the client's timer wins the race, the error is still `Timeout`.
pub fn default_client(timeout: Duration) -> reqwest::blocking::Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA_STRING));
    reqwest::blocking::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .expect("Couldn't build a client!")
}
