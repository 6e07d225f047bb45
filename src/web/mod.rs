// file: src/web/mod.rs
// description: HTTP router and server of the JSON search API
// reference: https://docs.rs/axum

pub mod handlers;
pub mod session;
pub mod types;

use crate::error::Result;
use crate::service::SearchService;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use session::DisplaySettings;
pub use types::{ApiResponse, ParagraphView};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

pub fn router(service: SearchService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/search", get(handlers::search))
        .route("/api/facets", get(handlers::facets))
        .route("/api/context/:source_uuid", get(handlers::context))
        .route("/api/paragraphs/:id", get(handlers::paragraph))
        .route("/api/books/:id", get(handlers::book))
        .route("/api/books/:id/paragraphs", get(handlers::book_paragraphs))
        .route(
            "/api/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(service: SearchService, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::post;
    use axum::{Json, Router as StubRouter};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn stub_search(Json(body): Json<Value>) -> Json<Value> {
        if body["query"].to_string().contains("999") {
            return Json(json!({ "hits": { "total": 0, "hits": [] } }));
        }

        Json(json!({
            "took": 1,
            "hits": {
                "total": 1,
                "hits": [{
                    "_id": 3,
                    "_score": 10,
                    "_source": { "title": "Nose", "content": "Major *Kovalyov*\nwoke up", "chunk": 3 },
                    "highlight": { "content": ["Major <mark>Kovalyov</mark>\nwoke up"] }
                }]
            },
            "aggregations": {
                "genre_group": { "buckets": [ { "key": "prose", "doc_count": 1 } ] }
            }
        }))
    }

    async fn app_with_engine(url: Option<String>) -> Router {
        let url = match url {
            Some(url) => url,
            None => {
                let stub = StubRouter::new().route("/search", post(stub_search));
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                let addr = listener.local_addr().unwrap();
                tokio::spawn(async move {
                    axum::serve(listener, stub).await.unwrap();
                });
                format!("http://{}", addr)
            }
        };

        let mut config = Config::default_config();
        config.manticore.url = url;
        config.manticore.timeout_secs = 2;
        router(SearchService::new(&config).unwrap())
    }

    async fn get_json(app: Router, uri: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let app = app_with_engine(None).await;
        let (status, body) = get_json(
            app,
            "/api/search?query=kovalyov&genre=prose&fuzzy=1&page=1",
            Some("single_line_mode=1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let data = &body["data"];
        assert_eq!(data["results"]["total_count"], json!(1));
        assert_eq!(
            data["results"]["items"][0]["content"],
            json!("Major <mark>Kovalyov</mark> woke up")
        );
        assert_eq!(data["facets"]["genre"][0]["active"], json!(true));
        assert!(data["notice"].is_string());
        assert_eq!(data["settings"]["single_line"], json!(true));
    }

    #[tokio::test]
    async fn test_user_errors_are_bad_requests() {
        let app = app_with_engine(None).await;

        let (status, body) =
            get_json(app.clone(), "/api/search?query=&matching=match", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("empty search query supplied"));

        let (status, _) = get_json(app.clone(), "/api/search?query=abc&matching=id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app, "/api/context/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_parameters_keep_the_envelope() {
        let app = app_with_engine(None).await;

        for uri in [
            "/api/search?query=kovalyov&page=abc",
            "/api/search?query=kovalyov&page=-1",
            "/api/books/4/paragraphs?page=2x",
            "/api/paragraphs/not-a-number",
        ] {
            let (status, body) = get_json(app.clone(), uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
            assert_eq!(body["success"], json!(false), "uri: {}", uri);
            assert!(body["error"].is_string(), "uri: {}", uri);
        }

        let (status, body) = get_json(app, "/api/search?query=kovalyov&page=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Invalid argument: page numbers start at 1"));
    }

    #[tokio::test]
    async fn test_lookups() {
        let app = app_with_engine(None).await;

        let (status, body) = get_json(app.clone(), "/api/paragraphs/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], json!(3));
        assert_eq!(body["data"]["title"], json!("Nose"));

        let (status, body) = get_json(app.clone(), "/api/paragraphs/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));

        let (status, body) = get_json(app.clone(), "/api/books/4/paragraphs?page=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["context_page"], json!(1));

        let (status, body) = get_json(app, "/api/facets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["genre"][0]["value"], json!("prose"));
    }

    #[tokio::test]
    async fn test_unreachable_engine() {
        let app = app_with_engine(Some("http://127.0.0.1:1".to_string())).await;

        let (status, body) = get_json(app.clone(), "/api/search?query=kovalyov", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], json!(false));

        let (status, body) = get_json(app, "/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], json!("unhealthy"));
    }

    #[tokio::test]
    async fn test_settings_cookies() {
        let app = app_with_engine(None).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/settings")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, "show_search_settings=1")
            .body(Body::from(r#"{"single_line":true}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(set_cookies.iter().any(|c| c.starts_with("single_line_mode=1")));
        assert!(set_cookies.iter().any(|c| c.starts_with("show_search_settings=1")));

        let (status, body) = get_json(
            app,
            "/api/settings",
            Some("show_search_settings=0; single_line_mode=1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({ "show_search_settings": false, "single_line": true })
        );
    }
}
