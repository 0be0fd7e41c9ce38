//! HTTP mode.
//!
//! `--serve <ADDR>` exposes the scraper as a single endpoint: every `GET /`
//! performs a fresh run and answers with the snapshot. Nothing is cached
//! between requests, and the currency table is re-read each time so edits to
//! a `--currencies` file take effect on the next request.
//!
//! A run that cannot start answers `500` with the failure envelope.

use crate::models::ScrapeResult;
use crate::outputs::json::{CONTENT_TYPE, render_failure, render_snapshot};
use crate::scrape::{self, ScrapeError, ScrapeSettings};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Build the router serving snapshots at `/`.
pub fn router(settings: Arc<ScrapeSettings>) -> Router {
    Router::new()
        .route("/", get(snapshot))
        .with_state(settings)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn start(addr: SocketAddr, settings: ScrapeSettings) -> Result<(), Box<dyn Error>> {
    let app = router(Arc::new(settings));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving rate snapshots on http://{addr}/");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn snapshot(State(settings): State<Arc<ScrapeSettings>>) -> Response {
    snapshot_response(scrape::run(&settings).await)
}

/// Turn the outcome of a run into an HTTP response.
pub fn snapshot_response(outcome: Result<ScrapeResult, ScrapeError>) -> Response {
    let rendered = outcome
        .map_err(|e| e.to_string())
        .and_then(|result| render_snapshot(&result).map_err(|e| e.to_string()));

    match rendered {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(reason) => {
            error!(%reason, "Scrape run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, CONTENT_TYPE)],
                render_failure(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::models::Currencies;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_success_response() {
        let result = ScrapeResult {
            ok: true,
            updated: "2025-05-06 14:31:00".to_string(),
            currencies: Currencies::default(),
        };
        let response = snapshot_response(Ok(result));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = body_text(response).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["currencies"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_catastrophic_failure_is_500() {
        let response = snapshot_response(Err(ScrapeError::Config(ConfigError::Empty)));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = body_text(response).await;
        assert_eq!(body, r#"{"ok":false,"error":"سرور با خطا مواجه شد"}"#);
    }

    #[tokio::test]
    async fn test_served_over_tcp() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let settings = ScrapeSettings {
            currencies: Some("/nonexistent/currencies.yaml".into()),
            ..ScrapeSettings::default()
        };
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(settings))).await.unwrap();
        });

        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
        let body = response.text().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["ok"], false);
    }
}
