//! This crate provides a small framework for building forward– and reverse-geocoding
//! clients against arbitrary address-lookup services.
//!
//! A provider only has to supply two things:
//!
//! - an [`EndpointBuilder`](endpoint/trait.EndpointBuilder.html), which turns an address
//!   or a [`Location`](struct.Location.html) into a request URL, and
//! - a [`ResponseParser`](parser/trait.ResponseParser.html), which decodes the provider's
//!   JSON payload and exposes the resulting location and address.
//!
//! Everything else (the HTTP round trip, unwrapping array-wrapped payloads, bounding the
//! request by a timeout and reporting empty results) is shared by the
//! [`Geocoder`](blocking/struct.Geocoder.html) facade.
//!
//! ### A note on Coordinate Order
//! [`Location`](struct.Location.html) stores `lat, lng`, the order most geocoding APIs
//! speak. Conversions to and from [`Point`](struct.Point.html) follow the georust
//! convention of `[Longitude, Latitude]` (`x, y`).
//!
//! ### Usage of rustls
//!
//! If you like to use [rustls](https://github.com/ctz/rustls) instead of OpenSSL
//! you can enable the `rustls-tls` feature in your `Cargo.toml`:
//!
//!```toml
//![dependencies]
//!geokit = { version = "*", default-features = false, features = ["rustls-tls", "blocking"] }
//!```
//!
//! ### Async
//!
//! The `async` feature adds [`async_impl::Geocoder`](async_impl/struct.Geocoder.html), which
//! runs on tokio and cancels the in-flight request when the timeout fires.

static UA_STRING: &str = "Rust-Geokit";

pub use geo_types::Point;
use num_traits::Float;
#[allow(unused_imports)]
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

mod error;
pub use crate::error::GeocodingError;

pub mod config;
pub use crate::config::{FailurePolicy, GeocoderConfig};

pub mod endpoint;
pub use crate::endpoint::EndpointBuilder;

pub mod parser;
pub use crate::parser::ResponseParser;

mod shared;

#[cfg(feature = "async")]
pub mod async_impl;
#[cfg(feature = "blocking")]
pub mod blocking;
#[cfg(feature = "blocking")]
pub use crate::blocking::Geocoder;

/// The time budget of a single geocoding round trip unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// A coordinate pair, the output of a forward-geocoding request
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Location { lat, lng }
    }

    /// `true` for the point `0°, 0°`.
    ///
    /// Many providers answer "nothing found" with a zeroed coordinate, which is
    /// why parsers commonly treat it as absent (see [`non_zero`](#method.non_zero)).
    pub fn is_zero(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// `None` if both coordinates are exactly zero, the location otherwise
    pub fn non_zero(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }
}

/// `(lat, lng)`
impl From<(f64, f64)> for Location {
    fn from((lat, lng): (f64, f64)) -> Self {
        Location { lat, lng }
    }
}

/// Convert a lon, lat (x, y) `Point` into a `Location`
impl<T> From<Point<T>> for Location
where
    T: Float,
{
    fn from(p: Point<T>) -> Self {
        Location {
            lat: p.y().to_f64().unwrap_or(f64::NAN),
            lng: p.x().to_f64().unwrap_or(f64::NAN),
        }
    }
}

impl From<Location> for Point<f64> {
    fn from(loc: Location) -> Self {
        Point::new(loc.lng, loc.lat)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}
