//! Thin client for the Cloudflare v4 REST API.
//!
//! Every call decodes the standard envelope (`success`, `errors`, `result`,
//! `result_info`). HTTP status codes are never inspected: the envelope's
//! `success` flag is the only verdict, and a body that is not an envelope is
//! reported as a decode error rather than an empty result.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::DnsError;

pub const PER_PAGE: u32 = 100;

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
    #[serde(skip)]
    pub raw: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultInfo {
    pub total_pages: Option<u32>,
}

impl ApiEnvelope {
    fn parse(raw: String) -> Result<ApiEnvelope, DnsError> {
        match serde_json::from_str::<ApiEnvelope>(&raw) {
            Ok(mut envelope) => {
                envelope.raw = raw;
                Ok(envelope)
            }
            Err(source) => Err(DnsError::Decode { source, raw }),
        }
    }

    /// Fails with [`DnsError::Api`] unless the envelope reports success.
    pub fn ensure_success(self) -> Result<ApiEnvelope, DnsError> {
        if self.success {
            return Ok(self);
        }
        let message = if self.errors.is_empty() {
            "request was not successful".to_string()
        } else {
            self.errors
                .iter()
                .map(|e| format!("{} ({})", e.message, e.code))
                .collect::<Vec<_>>()
                .join(", ")
        };
        Err(DnsError::Api {
            message,
            raw: self.raw,
        })
    }

    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, DnsError> {
        let envelope = self.ensure_success()?;
        serde_json::from_value(envelope.result).map_err(|source| DnsError::Decode {
            source,
            raw: envelope.raw,
        })
    }
}

impl ApiClient {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, DnsError> {
        let client = Client::builder()
            .user_agent(concat!("dns-zone-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Sends one request and decodes the envelope without judging it.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiEnvelope, DnsError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {} {:?}", method, url, query);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;
        debug!("{} -> {} ({} bytes)", url, status, raw.len());

        ApiEnvelope::parse(raw)
    }

    /// Reads every page of a list endpoint, in the order the API returns them.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DnsError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut params = query.to_vec();
            params.push(("page", page.to_string()));
            params.push(("per_page", PER_PAGE.to_string()));

            let envelope = self
                .request(Method::GET, path, &params, None)
                .await?
                .ensure_success()?;
            let info = envelope.result_info.clone().unwrap_or_default();

            let batch: Vec<T> = if envelope.result.is_null() {
                Vec::new()
            } else {
                envelope.into_result()?
            };
            let fetched = batch.len();
            items.extend(batch);

            let total_pages = info.total_pages.unwrap_or(1);
            if fetched == 0 || page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), "test_token_12345").unwrap()
    }

    #[tokio::test]
    async fn test_request_sends_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "errors": [], "messages": [], "result": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request(Method::GET, "/zones", &[], None)
            .await
            .unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_status_code_is_ignored_in_favour_of_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/zones/Z1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "errors": [{"code": 1003, "message": "Invalid zone identifier"}],
                "result": null
            })))
            .mount(&server)
            .await;

        let envelope = client(&server)
            .request(Method::DELETE, "/zones/Z1", &[], None)
            .await
            .unwrap();
        assert!(!envelope.success);

        let err = envelope.ensure_success().unwrap_err();
        match err {
            DnsError::Api { message, raw } => {
                assert_eq!(message, "Invalid zone identifier (1003)");
                assert!(raw.contains("Invalid zone identifier"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .request(Method::GET, "/zones", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::Decode { .. }));
        assert_eq!(err.raw_response(), Some("<html>Bad gateway</html>"));
    }

    #[tokio::test]
    async fn test_list_all_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "R1"}, {"id": "R2"}],
                "result_info": {"page": 1, "per_page": 2, "total_pages": 2, "count": 2, "total_count": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "R3"}],
                "result_info": {"page": 2, "per_page": 2, "total_pages": 2, "count": 1, "total_count": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids: Vec<Value> = client(&server)
            .list_all("/zones/Z1/dns_records", &[])
            .await
            .unwrap();
        let ids: Vec<&str> = ids.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3"]);
    }

    #[tokio::test]
    async fn test_list_all_stops_when_server_ignores_page_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "R1"}],
                "result_info": {"page": 1, "per_page": 1, "total_pages": 2, "count": 1, "total_count": 2}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let items: Vec<Value> = client(&server)
            .list_all("/zones/Z1/dns_records", &[])
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_single_page_without_result_info() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/Z1/dns_records"))
            .and(query_param("type", "CNAME"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": [{"id": "R1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items: Vec<Value> = client(&server)
            .list_all("/zones/Z1/dns_records", &[("type", "CNAME".to_string())])
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }
}
