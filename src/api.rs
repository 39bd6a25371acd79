//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the citation detection endpoint and system
//! status endpoints for the law-links service.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with text payloads
//! - **Output**: JSON responses with citation links and system status
//! - **Endpoints**: detect, health, stats, index page
//!
//! Handlers share the immutable `AppState`; detection itself cannot fail at
//! request time, so the detect handler has no error branch beyond payload
//! validation done by the framework.

use crate::errors::{DetectError, Result};
use crate::utils::{TextUtils, Timer};
use crate::LawLink;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Detection request payload
#[derive(Debug, Serialize, Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

/// Detection response payload
#[derive(Debug, Serialize, Deserialize)]
pub struct DetectResponse {
    pub links: Vec<LawLink>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until shutdown
    pub async fn run(self) -> Result<()> {
        let server = &self.app_state.config.server;
        let bind_addr = format!("{}:{}", server.host, server.port);
        let payload_limit = server.max_payload_size_mb * 1024 * 1024;
        let enable_cors = server.enable_cors;
        let workers = server.workers;
        let app_state = self.app_state.clone();

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .app_data(web::JsonConfig::default().limit(payload_limit))
                .wrap(cors)
                .route("/detect", web::post().to(detect_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/", web::get().to(index_handler))
        })
        .workers(workers)
        .bind(&bind_addr)
        .map_err(|e| DetectError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| DetectError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Detection endpoint handler
async fn detect_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<DetectRequest>,
) -> ActixResult<HttpResponse> {
    let timer = Timer::new("detect");

    let links = app_state.detector.detect(&request.text);

    tracing::debug!(
        "detect: {:?} ({} chars) -> {} links in {}ms",
        TextUtils::truncate(&request.text, 60),
        request.text.len(),
        links.len(),
        timer.elapsed_ms()
    );

    Ok(HttpResponse::Ok().json(DetectResponse { links }))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(app_state.started_at)
        .num_seconds();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(app_state.started_at)
        .num_seconds();

    let response = serde_json::json!({
        "laws": app_state.detector.law_count(),
        "aliases": app_state.detector.alias_count(),
        "uptime_seconds": uptime,
    });

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Law Links Service</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Law Links Service API</h1>
        <p>Сервис для выделения юридических ссылок из текста.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /detect
            <p>Extract structured legal-citation references from Russian legal text.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Check the health status of the service.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /stats
            <p>Get alias table statistics and uptime.</p>
        </div>

        <h2>Example Request</h2>
        <pre>{
  "text": "согласно подпункту б пункта 3 статьи 45 Гражданского кодекса"
}</pre>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::AliasTable;
    use crate::config::Config;
    use crate::detector::LinkDetector;
    use crate::AppState;
    use actix_web::test;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let config = Config::default();
        let table = AliasTable::from_json(
            r#"{"1": ["Гражданский кодекс", "ГК РФ"], "2": ["Налоговый кодекс", "НК РФ"]}"#,
        )
        .unwrap();
        let detector = LinkDetector::new(&table, &config.detection);

        AppState {
            config: Arc::new(config),
            detector: Arc::new(detector),
            started_at: chrono::Utc::now(),
        }
    }

    #[actix_web::test]
    async fn test_detect_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/detect", web::post().to(detect_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/detect")
            .set_json(DetectRequest {
                text: "статья 12, 13 Налогового кодекса".to_string(),
            })
            .to_request();
        let response: DetectResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(response.links.len(), 2);
        assert_eq!(response.links[0].article, "12");
        assert_eq!(response.links[1].article, "13");
        assert!(response.links.iter().all(|l| l.law_id == Some(2)));
    }

    #[actix_web::test]
    async fn test_detect_empty_text() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/detect", web::post().to(detect_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/detect")
            .set_json(DetectRequest {
                text: String::new(),
            })
            .to_request();
        let response: DetectResponse = test::call_and_read_body_json(&app, req).await;

        assert!(response.links.is_empty());
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/health", web::get().to(health_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let response: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(response.status, "healthy");
        assert!(response.uptime_seconds >= 0);
    }

    #[actix_web::test]
    async fn test_stats_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/stats", web::get().to(stats_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/stats").to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(response["laws"], 2);
        assert_eq!(response["aliases"], 4);
    }
}
