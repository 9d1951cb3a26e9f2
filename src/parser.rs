//! Decoding provider payloads.
//!
//! ### Example
//!
//! ```
//! use geokit::parser::{decode_json, non_empty, ResponseParser};
//! use geokit::{GeocodingError, Location};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! struct Place {
//!     lat: f64,
//!     lon: f64,
//!     display_name: String,
//! }
//!
//! #[derive(Default)]
//! struct NominatimParser {
//!     place: Place,
//! }
//!
//! impl ResponseParser for NominatimParser {
//!     fn decode(&mut self, payload: &[u8]) -> Result<(), GeocodingError> {
//!         self.place = decode_json(payload)?;
//!         Ok(())
//!     }
//!
//!     fn location(&self) -> Option<Location> {
//!         Location::new(self.place.lat, self.place.lon).non_zero()
//!     }
//!
//!     fn address(&self) -> Option<String> {
//!         non_empty(self.place.display_name.clone())
//!     }
//!
//!     fn fresh(&self) -> Self {
//!         NominatimParser::default()
//!     }
//! }
//!
//! let mut parser = NominatimParser::default();
//! parser
//!     .decode(br#"{"lat":48.1700887,"lon":11.5884858,"display_name":"Schwabing"}"#)
//!     .unwrap();
//! assert_eq!(parser.location(), Some(Location::new(48.1700887, 11.5884858)));
//! assert_eq!(parser.fresh().location(), None);
//! ```
use crate::{GeocodingError, Location};
use serde::de::DeserializeOwned;

/// Decode a provider payload and expose the normalized result.
///
/// A parser holds the state of one decoded payload. The `Geocoder` keeps one
/// instance as a prototype and calls [`fresh`](#tymethod.fresh) for every
/// request, so a decode target is never shared between requests.
pub trait ResponseParser: Send + 'static {
    /// Decode `payload` into `self`. The payload has already been unwrapped
    /// from a single-element array if the geocoder is configured to do so.
    fn decode(&mut self, payload: &[u8]) -> Result<(), GeocodingError>;

    /// The decoded coordinate, `None` if nothing usable was decoded
    fn location(&self) -> Option<Location>;

    /// The decoded address, `None` if nothing usable was decoded
    fn address(&self) -> Option<String>;

    /// A new, blank instance of the same parser
    fn fresh(&self) -> Self
    where
        Self: Sized;
}

/// Deserialize a JSON payload, the common case for `ResponseParser::decode`
pub fn decode_json<T>(payload: &[u8]) -> Result<T, GeocodingError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_slice(payload)?)
}

/// `None` for an empty string
pub fn non_empty(address: String) -> Option<String> {
    if address.is_empty() {
        None
    } else {
        Some(address)
    }
}

/// Trim surrounding ASCII whitespace and square brackets.
///
/// Providers that answer with a single result wrapped in an array
/// (`[{...}]`, often followed by a newline) then decode exactly like the
/// bare object.
pub(crate) fn unwrap_array(body: &[u8]) -> &[u8] {
    let is_wrapping = |b: &u8| b.is_ascii_whitespace() || *b == b'[' || *b == b']';
    let start = body.iter().position(|b| !is_wrapping(b)).unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|b| !is_wrapping(b))
        .map_or(start, |i| i + 1);
    &body[start..end]
}
