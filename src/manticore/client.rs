// file: src/manticore/client.rs
// description: Manticore JSON API client behind the authenticating proxy
// reference: https://manual.manticoresearch.com/Connecting_to_the_server/HTTP

use super::request::{QueryNode, SearchRequest};
use super::response::{ErrorResponse, SearchResponse};
use crate::config::ManticoreConfig;
use crate::error::{Result, SearchError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct ManticoreClient {
    client: Client,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

impl ManticoreClient {
    pub fn new(config: &ManticoreConfig) -> Result<Self> {
        info!("Using Manticore at {} (table {})", config.url, config.table);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_none() {
            warn!("No API key configured, requests go to the engine unauthenticated");
        }

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/search", self.base_url);

        debug!(
            "POST {} table={} limit={} offset={}",
            url, request.table, request.limit, request.offset
        );

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message())
                .unwrap_or_else(|_| body.trim().to_string());
            warn!("Manticore rejected request with {}: {}", status, message);
            return Err(SearchError::Engine {
                status: status.as_u16(),
                message,
            });
        }

        // Some engine errors arrive with 200 and an `error` member.
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(SearchError::Engine {
                status: status.as_u16(),
                message: error.message(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!(
            "Manticore answered in {} ms with {} of {} hits",
            parsed.took,
            parsed.hits.hits.len(),
            parsed.hits.total
        );

        Ok(parsed)
    }

    /// Empty search against the configured table.
    pub async fn ping(&self) -> Result<bool> {
        debug!("Checking Manticore connection");

        let mut request = SearchRequest::new(&self.table, QueryNode::match_all());
        request.limit = 0;

        self.search(&request).await?;
        info!("Manticore connection successful");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn stub_search(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid api key" })),
            );
        }

        if body["table"] == "missing" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "unknown table 'missing'" })),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "took": 1,
                "timed_out": false,
                "hits": {
                    "total": 1,
                    "hits": [ { "_id": 7, "_score": 1, "_source": { "content": "text" } } ]
                }
            })),
        )
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/search", post(stub_search));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn config(url: String, table: &str, api_key: Option<&str>) -> ManticoreConfig {
        ManticoreConfig {
            url,
            table: table.to_string(),
            api_key: api_key.map(str::to_string),
            api_key_file: None,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_search_sends_api_key() {
        let url = spawn_stub().await;
        let client = ManticoreClient::new(&config(url, "library2025", Some("secret"))).unwrap();

        let request = SearchRequest::new(client.table(), QueryNode::match_all());
        let response = client.search(&request).await.unwrap();

        assert_eq!(response.hits.total, 1);
        assert_eq!(response.hits.hits[0].id, 7);
        assert!(client.ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_engine_error() {
        let url = spawn_stub().await;
        let client = ManticoreClient::new(&config(url, "library2025", None)).unwrap();

        let request = SearchRequest::new(client.table(), QueryNode::match_all());
        match client.search(&request).await {
            Err(SearchError::Engine { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.hits.total)),
        }
    }

    #[tokio::test]
    async fn test_engine_error_message() {
        let url = spawn_stub().await;
        let client = ManticoreClient::new(&config(url, "missing", Some("secret"))).unwrap();

        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, SearchError::Engine { status: 400, .. }));
        assert!(err.to_string().contains("unknown table"));
    }
}
