use crate::async_impl::{default_client, Transport};
use crate::shared;
use crate::{EndpointBuilder, GeocoderConfig, GeocodingError, Location, ResponseParser};

/// A geocoder composed of one provider's endpoint builder and response parser.
///
/// See [`blocking::Geocoder`](../blocking/struct.Geocoder.html) for the semantics;
/// the only difference is that a timed out request is cancelled.
pub struct Geocoder<B, P, T = reqwest::Client> {
    builder: B,
    parser: P,
    transport: T,
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

    pub fn new_with_config(builder: B, parser: P, config: GeocoderConfig) -> Self {
        Geocoder::new_with_transport(builder, parser, default_client(), config)
    }
}

impl<B, P, T> Geocoder<B, P, T>
where
    B: EndpointBuilder,
    P: ResponseParser,
    T: Transport,
{
    pub fn new_with_transport(builder: B, parser: P, transport: T, config: GeocoderConfig) -> Self {
        Geocoder {
            builder,
            parser,
            transport,
            config,
        }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    pub async fn geocode(&self, address: &str) -> Result<Location, GeocodingError> {
        let url = self.builder.geocode_url(address);
        self.timed_request(url, P::location).await
    }

    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<String, GeocodingError> {
        let url = self.builder.reverse_geocode_url(&Location::new(lat, lng));
        self.timed_request(url, P::address).await
    }

    async fn timed_request<V>(
        &self,
        url: String,
        extract: fn(&P) -> Option<V>,
    ) -> Result<V, GeocodingError> {
        let mut target = self.parser.fresh();
        let policy = self.config.failure_policy;

        log::debug!("Geocoding request to {}", url);
        let round_trip = async {
            let decoded = match self.transport.fetch(&url).await {
                Ok(body) => shared::decode_body(&mut target, &body, &self.config),
                Err(err) => Err(err),
            };
            shared::extract(&target, decoded, extract, policy)
        };

        match tokio::time::timeout(self.config.timeout, round_trip).await {
            Ok(fetched) => shared::classify(fetched),
            Err(_) => {
                log::warn!(
                    "Geocoding request to {} timed out after {:?}",
                    url,
                    self.config.timeout
                );
                Err(GeocodingError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod async_test {
    use super::*;
    use crate::parser::{decode_json, non_empty};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct FakeBuilder;

    impl EndpointBuilder for FakeBuilder {
        fn geocode_url(&self, address: &str) -> String {
            format!("http://fake/geocode?q={}", address)
        }

        fn reverse_geocode_url(&self, location: &Location) -> String {
            format!("http://fake/reverse?latlng={}", location)
        }
    }

    #[derive(Default, Deserialize)]
    #[serde(default)]
    struct FakeParser {
        lat: f64,
        lng: f64,
        address: String,
    }

    impl ResponseParser for FakeParser {
        fn decode(&mut self, payload: &[u8]) -> Result<(), GeocodingError> {
            *self = decode_json(payload)?;
            Ok(())
        }

        fn location(&self) -> Option<Location> {
            Location::new(self.lat, self.lng).non_zero()
        }

        fn address(&self) -> Option<String> {
            non_empty(self.address.clone())
        }

        fn fresh(&self) -> Self {
            FakeParser::default()
        }
    }

    #[derive(Default)]
    struct CannedTransport {
        bodies: HashMap<String, String>,
        delay: Option<Duration>,
    }

    impl CannedTransport {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, GeocodingError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.bodies
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or(GeocodingError::Status(StatusCode::NOT_FOUND))
        }
    }

    /// Sets its flag when dropped
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Hangs, and records whether the hanging request was dropped
    #[derive(Default)]
    struct HangingTransport {
        cancelled: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Transport for HangingTransport {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, GeocodingError> {
            let _guard = DropFlag(Arc::clone(&self.cancelled));
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    fn geocoder<T: Transport>(transport: T) -> Geocoder<FakeBuilder, FakeParser, T> {
        Geocoder::new_with_transport(
            FakeBuilder,
            FakeParser::default(),
            transport,
            GeocoderConfig::default(),
        )
    }

    #[tokio::test]
    async fn geocode_paris_test() {
        let transport = CannedTransport::default().with(
            "http://fake/geocode?q=Paris",
            r#"{"lat":48.8566,"lng":2.3522}"#,
        );
        let res = geocoder(transport).geocode("Paris").await;
        assert_eq!(res.unwrap(), Location::new(48.8566, 2.3522));
    }

    #[tokio::test]
    async fn geocode_no_result_test() {
        let transport = CannedTransport::default()
            .with("http://fake/geocode?q=Atlantis", r#"[{"lat":0,"lng":0}]"#);
        let res = geocoder(transport).geocode("Atlantis").await;
        assert!(res.unwrap_err().is_no_result());
    }

    #[tokio::test]
    async fn reverse_geocode_test() {
        let transport = CannedTransport::default()
            .with(
                "http://fake/reverse?latlng=41.40139,2.1287",
                r#"{"address":"Carrer de Calatrava, 68, 08017 Barcelona, Spain"}"#,
            )
            .with("http://fake/reverse?latlng=1,2", "{}");
        let geocoder = geocoder(transport);
        assert_eq!(
            geocoder.reverse_geocode(41.40139, 2.1287).await.unwrap(),
            "Carrer de Calatrava, 68, 08017 Barcelona, Spain"
        );
        assert!(geocoder
            .reverse_geocode(1.0, 2.0)
            .await
            .unwrap_err()
            .is_no_result());
    }

    #[tokio::test]
    async fn geocode_surfaces_decode_errors() {
        let transport =
            CannedTransport::default().with("http://fake/geocode?q=Paris", "Service Unavailable");
        let res = geocoder(transport).geocode("Paris").await;
        assert!(matches!(res, Err(GeocodingError::Decode(_))));
    }

    #[tokio::test]
    async fn timeout_cancels_request_test() {
        let timeout = Duration::from_millis(300);
        let transport = HangingTransport::default();
        let cancelled = Arc::clone(&transport.cancelled);
        let config = GeocoderConfig::default().with_timeout(timeout);
        let geocoder =
            Geocoder::new_with_transport(FakeBuilder, FakeParser::default(), transport, config);

        let start = Instant::now();
        let res = geocoder.geocode("Paris").await;
        let elapsed = start.elapsed();
        assert!(res.unwrap_err().is_timeout());
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(250));
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn reverse_geocode_timeout_test() {
        let config = GeocoderConfig::default().with_timeout(Duration::from_millis(200));
        let geocoder = Geocoder::new_with_transport(
            FakeBuilder,
            FakeParser::default(),
            HangingTransport::default(),
            config,
        );
        assert!(geocoder
            .reverse_geocode(48.8566, 2.3522)
            .await
            .unwrap_err()
            .is_timeout());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_test() {
        const N: usize = 16;
        let mut transport = CannedTransport {
            delay: Some(Duration::from_millis(50)),
            ..CannedTransport::default()
        };
        for i in 0..N {
            transport = transport.with(
                &format!("http://fake/geocode?q=city-{}", i),
                &format!(r#"{{"lat":{},"lng":{}}}"#, i + 1, i + 2),
            );
        }
        let geocoder = Arc::new(geocoder(transport));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let geocoder = Arc::clone(&geocoder);
                tokio::spawn(async move {
                    let location = geocoder.geocode(&format!("city-{}", i)).await;
                    (i, location)
                })
            })
            .collect();

        for handle in handles {
            let (i, location) = handle.await.unwrap();
            assert_eq!(
                location.unwrap(),
                Location::new((i + 1) as f64, (i + 2) as f64)
            );
        }
    }

    /// Accepts connections and never writes a byte back
    fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        format!("http://{}", addr)
    }

    struct ServerBuilder(String);

    impl EndpointBuilder for ServerBuilder {
        fn geocode_url(&self, address: &str) -> String {
            crate::endpoint::with_query(&format!("{}/geocode", self.0), &[("q", address)])
        }

        fn reverse_geocode_url(&self, location: &Location) -> String {
            format!("{}/reverse?latlng={}", self.0, location)
        }
    }

    #[tokio::test]
    async fn hanging_connection_times_out_test() {
        let timeout = Duration::from_millis(100);
        let config = GeocoderConfig::default().with_timeout(timeout);
        let geocoder =
            Geocoder::new_with_config(ServerBuilder(silent_server()), FakeParser::default(), config);

        for _ in 0..20 {
            let start = Instant::now();
            match geocoder.geocode("Paris").await {
                Err(GeocodingError::Timeout) => {}
                other => panic!("expected a timeout, got {:?}", other),
            }
            assert!(start.elapsed() < timeout + Duration::from_millis(250));
        }
    }
}
