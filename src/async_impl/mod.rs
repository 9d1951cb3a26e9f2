//! The async geocoder, racing each round trip against a `tokio` timer.
//!
//! Unlike the blocking flavour, a request that runs out of time is dropped,
//! which also aborts the underlying HTTP request.
use async_trait::async_trait;

use crate::{GeocodingError, HeaderMap, HeaderValue, UA_STRING, USER_AGENT};

mod geocoder;

pub use self::geocoder::Geocoder;

#[async_trait]
pub trait Transport: Send + Sync {
    // NOTE TO IMPLEMENTERS: non-success status codes must be reported as
    // errors, otherwise error pages end up in the response parser
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GeocodingError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GeocodingError> {
        let resp = self.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

/// The default transport
pub fn default_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA_STRING));
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Couldn't build a client!")
}

#[cfg(test)]
mod async_test {
    use super::*;
    use mockito::Server;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn fetch_test() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/reverse?latlng=48.8566,2.3522")
            .match_header("user-agent", "Rust-Geokit")
            .with_body(r#"{"address":"Paris"}"#)
            .create_async()
            .await;
        let body = default_client()
            .fetch(&format!("{}/reverse?latlng=48.8566,2.3522", server.url()))
            .await
            .unwrap();
        assert_eq!(body, br#"{"address":"Paris"}"#.to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_status_test() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode")
            .with_status(429)
            .create_async()
            .await;
        let res = default_client()
            .fetch(&format!("{}/geocode", server.url()))
            .await;
        assert!(matches!(
            res,
            Err(GeocodingError::Status(status)) if status == StatusCode::TOO_MANY_REQUESTS
        ));
        mock.assert_async().await;
    }
}
