//! HTTP routes.
//!
//! A thin request layer: handlers extract plain data, call one service
//! method, and return the entity as JSON. Everything else (status codes,
//! message bodies) is handled by [`crate::error::AppError`].

pub mod keywords;
pub mod plans;
pub mod spots;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the full catalog router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(keywords::router())
        .merge(tags::router())
        .merge(plans::router())
        .merge(spots::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::CatalogConfig;
    use crate::state::AppState;

    use super::*;

    fn app() -> Router {
        let config = CatalogConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            sentry_dsn: None,
        };
        routes().with_state(AppState::in_memory(config))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_tag_keyword_flow_over_http() {
        let app = app();

        let (status, tag) = send(
            &app,
            Method::POST,
            "/tags",
            Some(json!({"name": "Outdoor"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tag["name"], "outdoor");
        let tag_id = tag["id"].as_str().unwrap().to_owned();

        let (status, tagged) = send(
            &app,
            Method::PUT,
            &format!("/tags/keywords/{tag_id}"),
            Some(json!([
                {"name": "Hiking"},
                {"name": "hiking"},
                {"name": "Camping"}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tagged["keywords"].as_array().unwrap().len(), 2);

        let (status, trimmed) = send(
            &app,
            Method::DELETE,
            &format!("/tags/keywords/{tag_id}/Hiking"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trimmed["keywords"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tag_is_404_with_message() {
        let app = app();

        let id = uuid::Uuid::new_v4();
        let (status, body) = send(&app, Method::GET, &format!("/tags/id/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_409() {
        let app = app();

        send(&app, Method::POST, "/tags", Some(json!({"name": "city"}))).await;
        let (status, body) =
            send(&app, Method::POST, "/tags", Some(json!({"name": "City"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn test_empty_keyword_listing_is_404() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/keywords", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_spot_pagination_window() {
        let app = app();

        for name in ["Pier", "Cove", "Summit"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/spots",
                Some(json!({"name": name, "address": "1 Shore Rd"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, page) = send(
            &app,
            Method::GET,
            "/spots/pagination?page=2&limit=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.as_array().unwrap().len(), 1);
        assert_eq!(page[0]["name"], "Summit");
    }
}
