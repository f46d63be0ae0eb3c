// src/services/fetcher.rs

//! Record fetcher service.
//!
//! Issues exactly one `packagedetails` request per identifier and maps the
//! outcome onto the fetch failure taxonomy. Retry policy, if any, belongs
//! to the scheduler; this layer never retries.

use reqwest::Client;
use serde_json::Value;

use crate::error::{FetchError, FetchErrorKind, Result};
use crate::models::raw::RawRecord;
use crate::models::{PackageId, ProviderConfig};
use crate::utils::http;

/// Service for fetching single package records from the provider.
#[derive(Clone)]
pub struct PackageFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PackageFetcher {
    /// Create a new fetcher with a client configured from `config`.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the record for one identifier.
    ///
    /// Exactly one outbound request; the error carries the identifier so a
    /// failure can be attributed without extra bookkeeping downstream.
    pub async fn fetch(&self, id: PackageId) -> std::result::Result<RawRecord, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("packageids", id.to_string()), ("key", self.api_key.clone())])
            .send()
            .await
            .map_err(|e| FetchError::new(id, FetchErrorKind::Connection(e)))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(FetchError::new(
                id,
                FetchErrorKind::BadRequest(status.as_u16()),
            ));
        }
        if status.is_server_error() {
            return Err(FetchError::new(
                id,
                FetchErrorKind::ServerError(status.as_u16()),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            log::debug!("package {id}: body is not JSON: {e}");
            FetchError::new(id, FetchErrorKind::EmptyResponse)
        })?;

        Self::extract_record(id, body).map_err(|kind| FetchError::new(id, kind))
    }

    /// Pull the record for `id` out of the response body.
    ///
    /// The body is an object keyed by the stringified identifier; a null
    /// body, an empty object, a missing key or a malformed record all count
    /// as an empty response.
    fn extract_record(
        id: PackageId,
        body: Value,
    ) -> std::result::Result<RawRecord, FetchErrorKind> {
        let map = match body {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(FetchErrorKind::EmptyResponse),
        };

        let entry = map
            .get(&id.to_string())
            .cloned()
            .ok_or(FetchErrorKind::EmptyResponse)?;

        serde_json::from_value(entry).map_err(|e| {
            log::debug!("package {id}: malformed record: {e}");
            FetchErrorKind::EmptyResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fetcher_for(server_uri: &str) -> PackageFetcher {
        let config = ProviderConfig {
            endpoint: format!("{server_uri}/api/packagedetails/"),
            api_key: "test-key".to_string(),
            ..ProviderConfig::default()
        };
        PackageFetcher::new(&config).unwrap()
    }

    #[test]
    fn extract_record_reads_keyed_entry() {
        let body = json!({"77": {"success": false}});
        let record = PackageFetcher::extract_record(77, body).unwrap();
        assert!(!record.success);
    }

    #[test]
    fn extract_record_rejects_null_body() {
        assert!(matches!(
            PackageFetcher::extract_record(77, Value::Null),
            Err(FetchErrorKind::EmptyResponse)
        ));
    }

    #[test]
    fn extract_record_rejects_empty_object() {
        assert!(matches!(
            PackageFetcher::extract_record(77, json!({})),
            Err(FetchErrorKind::EmptyResponse)
        ));
    }

    #[test]
    fn extract_record_rejects_missing_key() {
        let body = json!({"78": {"success": true}});
        assert!(matches!(
            PackageFetcher::extract_record(77, body),
            Err(FetchErrorKind::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn fetch_passes_identifier_and_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/packagedetails/"))
            .and(query_param("packageids", "123"))
            .and(query_param("key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"123": {"success": false}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let record = fetcher_for(&server.uri()).fetch(123).await.unwrap();
        assert!(!record.success);
    }

    #[tokio::test]
    async fn fetch_maps_client_errors_to_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = fetcher_for(&server.uri()).fetch(123).await.unwrap_err();
        assert_eq!(err.id, 123);
        assert!(matches!(err.kind, FetchErrorKind::BadRequest(403)));
    }

    #[tokio::test]
    async fn fetch_maps_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = fetcher_for(&server.uri()).fetch(123).await.unwrap_err();
        assert!(matches!(err.kind, FetchErrorKind::ServerError(502)));
    }

    #[tokio::test]
    async fn fetch_maps_unreachable_host_to_connection() {
        // Port 1 on localhost is not listening.
        let config = ProviderConfig {
            endpoint: "http://127.0.0.1:1/api/packagedetails/".to_string(),
            api_key: "test-key".to_string(),
            ..ProviderConfig::default()
        };
        let fetcher = PackageFetcher::new(&config).unwrap();
        let err = fetcher.fetch(9).await.unwrap_err();
        assert!(matches!(err.kind, FetchErrorKind::Connection(_)));
    }
}
