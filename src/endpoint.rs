//! Building request URLs for a provider.
//!
//! ### Example
//!
//! ```
//! use geokit::endpoint::{with_query, EndpointBuilder};
//! use geokit::Location;
//!
//! struct Nominatim {
//!     endpoint: String,
//! }
//!
//! impl EndpointBuilder for Nominatim {
//!     fn geocode_url(&self, address: &str) -> String {
//!         with_query(&format!("{}search", self.endpoint), &[("q", address), ("format", "json")])
//!     }
//!
//!     fn reverse_geocode_url(&self, location: &Location) -> String {
//!         let lat = location.lat.to_string();
//!         let lon = location.lng.to_string();
//!         with_query(
//!             &format!("{}reverse", self.endpoint),
//!             &[("lat", lat.as_str()), ("lon", lon.as_str()), ("format", "json")],
//!         )
//!     }
//! }
//!
//! let osm = Nominatim { endpoint: "https://nominatim.openstreetmap.org/".to_string() };
//! assert_eq!(
//!     osm.geocode_url("Schwabing, München"),
//!     "https://nominatim.openstreetmap.org/search?q=Schwabing%2C+M%C3%BCnchen&format=json"
//! );
//! ```
use crate::Location;
use reqwest::Url;
use url::form_urlencoded;

/// Build the request URLs for geocode / reverse geocode.
///
/// Implementations are shared by every request of a `Geocoder`, possibly
/// from several threads at once, and must not rely on mutation.
pub trait EndpointBuilder: Send + Sync {
    // NOTE TO IMPLEMENTERS: `address` is passed as the caller typed it.
    // Escaping it (e.g. with `with_query`) is up to you.
    fn geocode_url(&self, address: &str) -> String;

    fn reverse_geocode_url(&self, location: &Location) -> String;
}

impl<B> EndpointBuilder for Box<B>
where
    B: EndpointBuilder + ?Sized,
{
    fn geocode_url(&self, address: &str) -> String {
        (**self).geocode_url(address)
    }

    fn reverse_geocode_url(&self, location: &Location) -> String {
        (**self).reverse_geocode_url(location)
    }
}

/// Append url-encoded query parameters to `base`.
///
/// `base` should be an absolute URL. If it can't be parsed the encoded
/// parameters are appended to it as is, so that the failure shows up as a
/// request error instead of a panic.
pub fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.into(),
        Err(_) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            format!("{}?{}", base, query)
        }
    }
}
