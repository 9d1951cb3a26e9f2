use crate::blocking::{default_client, Transport};
use crate::shared::{self, Fetched};
use crate::{EndpointBuilder, GeocoderConfig, GeocodingError, Location, ResponseParser};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;

/// A geocoder composed of one provider's endpoint builder and response parser.
///
/// Each call to [`geocode`](#method.geocode) or [`reverse_geocode`](#method.reverse_geocode)
/// decodes into a fresh parser instance on its own worker thread and waits at most
/// `config.timeout` for it. A single `Geocoder` can be shared between threads.
pub struct Geocoder<B, P, T = reqwest::blocking::Client> {
    builder: B,
    parser: P,
    transport: Arc<T>,
    config: GeocoderConfig,
}

impl<B, P> Geocoder<B, P>
where
    B: EndpointBuilder,
    P: ResponseParser,
{
    /// Create a new geocoder with the default configuration and HTTP client
    pub fn new(builder: B, parser: P) -> Self {
        Geocoder::new_with_config(builder, parser, GeocoderConfig::default())
    }

    /// Create a new geocoder with a custom configuration.
    ///
    /// The HTTP client is built with the configured timeout.
    pub fn new_with_config(builder: B, parser: P, config: GeocoderConfig) -> Self {
        let client = default_client(config.timeout);
        Geocoder::new_with_transport(builder, parser, client, config)
    }
}

impl<B, P, T> Geocoder<B, P, T>
where
    B: EndpointBuilder,
    P: ResponseParser,
    T: Transport,
{
    /// Create a new geocoder fetching through a custom [`Transport`](trait.Transport.html)
    pub fn new_with_transport(builder: B, parser: P, transport: T, config: GeocoderConfig) -> Self {
        Geocoder {
            builder,
            parser,
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Resolve an address to a location.
    ///
    /// Fails with `Timeout` if the provider did not answer within the configured
    /// timeout and with `NoResult` if it answered without a usable location.
    pub fn geocode(&self, address: &str) -> Result<Location, GeocodingError> {
        let url = self.builder.geocode_url(address);
        self.timed_request(url, P::location)
    }

    /// Resolve a coordinate pair to an address.
    ///
    /// Fails like [`geocode`](#method.geocode), with an empty address being `NoResult`.
    pub fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String, GeocodingError> {
        let url = self.builder.reverse_geocode_url(&Location::new(lat, lng));
        self.timed_request(url, P::address)
    }

    fn timed_request<V>(
        &self,
        url: String,
        extract: fn(&P) -> Option<V>,
    ) -> Result<V, GeocodingError>
    where
        V: Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Fetched<V>>();
        let mut target = self.parser.fresh();
        let transport = Arc::clone(&self.transport);
        let config = self.config;

        log::debug!("Geocoding request to {}", url);
        thread::spawn(move || {
            let round_trip = fetch(&*transport, &url, &mut target, &config);
            let fetched = shared::extract(&target, round_trip, extract, config.failure_policy);
            // The receiver is gone if the caller already timed out
            if tx.send(fetched).is_err() {
                log::debug!("Discarding late response from {}", url);
            }
        });

        match rx.recv_timeout(self.config.timeout) {
            Ok(fetched) => shared::classify(fetched),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Geocoding request timed out after {:?}", self.config.timeout);
                Err(GeocodingError::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Geocoding worker exited without a result");
                Err(GeocodingError::NoResult)
            }
        }
    }
}

/// One round trip: GET the url and decode the body into `target`
fn fetch<T, P>(
    transport: &T,
    url: &str,
    target: &mut P,
    config: &GeocoderConfig,
) -> Result<(), GeocodingError>
where
    T: Transport + ?Sized,
    P: ResponseParser,
{
    let body = transport.fetch(url)?;
    shared::decode_body(target, &body, config)
}
