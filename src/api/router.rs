//! HTTP API router.
//!
//! Returns a composable `Router` with the JSON API nested under `/api/`
//! and signed-URL file delivery at `/files/signed/:token`. All `/api/`
//! routes require bearer token authentication.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` via `with_state`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/contracts",
            post(endpoints::contracts::upload).get(endpoints::contracts::list),
        )
        .route(
            "/contracts/:id/review",
            post(endpoints::contracts::start_review).get(endpoints::contracts::get_review),
        )
        .route(
            "/documents",
            post(endpoints::documents::generate).get(endpoints::documents::list),
        )
        .route(
            "/reports",
            post(endpoints::reports::create).get(endpoints::reports::list),
        )
        .route(
            "/reports/:id/status",
            patch(endpoints::reports::update_status),
        )
        .route("/news", get(endpoints::news::legal_news))
        .with_state(ctx.clone())
        // Leave headroom above the validation limit so oversized uploads
        // reach the handler and get the structured 413 instead of a
        // framework-level rejection.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    // The signed-URL token is its own credential; no bearer auth here.
    let files = Router::new()
        .route("/files/signed/:token", get(endpoints::files::fetch_signed))
        .with_state(ctx);

    Router::new()
        .nest("/api", protected)
        .merge(files)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::db::repository::{contract, session};
    use crate::db::Db;
    use crate::intelligence::{MockReviewGenerator, ReviewGenerator};
    use crate::models::enums::ContractStatus;
    use crate::models::Contract;
    use crate::news::{NewsCache, NewsService, NEWS_CACHE_TTL};
    use crate::storage::ObjectStore;

    struct TestApp {
        ctx: ApiContext,
        db: Db,
        generator: Arc<MockReviewGenerator>,
        token: String,
        user_id: Uuid,
        _tmp: tempfile::TempDir,
    }

    impl TestApp {
        fn router(&self) -> Router {
            api_router(self.ctx.clone())
        }
    }

    fn test_app(generator: MockReviewGenerator) -> TestApp {
        let tmp = tempfile::tempdir().unwrap();
        let db = crate::db::shared(crate::db::open_in_memory().unwrap());
        let store = Arc::new(ObjectStore::new(tmp.path()));
        let generator = Arc::new(generator);
        // Unroutable base URL; no test exercises the network
        let news = Arc::new(NewsService::new(
            "http://127.0.0.1:9",
            "",
            NewsCache::new(NEWS_CACHE_TTL),
        ));
        let ctx = ApiContext::new(
            db.clone(),
            store,
            generator.clone() as Arc<dyn ReviewGenerator>,
            news,
        );

        let user_id = Uuid::new_v4();
        let token = {
            let conn = db.lock().unwrap();
            session::create_session(&conn, &user_id).unwrap()
        };

        TestApp {
            ctx,
            db,
            generator,
            token,
            user_id,
            _tmp: tmp,
        }
    }

    fn make_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_request(uri: &str, token: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(
        token: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Request<Body> {
        let boundary = "test-boundary-7f2a";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/contracts")
            .header("Authorization", format!("Bearer {token}"))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Seed a pending contract owned by `user_id`, backed by a stored object.
    fn seed_text_contract(app: &TestApp, user_id: Uuid, body: &[u8]) -> Uuid {
        let key = app.ctx.store.store(&user_id, "terms.txt", body).unwrap();
        let now = crate::db::repository::now();
        let record = Contract {
            id: Uuid::new_v4(),
            user_id,
            file_name: "terms.txt".into(),
            file_path: key,
            file_type: "text/plain".into(),
            file_size: body.len() as u64,
            status: ContractStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let conn = app.db.lock().unwrap();
        contract::insert_contract(&conn, &record).unwrap();
        record.id
    }

    fn file_count(dir: &std::path::Path) -> usize {
        let mut n = 0;
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            for entry in std::fs::read_dir(&d).unwrap() {
                let entry = entry.unwrap();
                if entry.file_type().unwrap().is_dir() {
                    stack.push(entry.path());
                } else {
                    n += 1;
                }
            }
        }
        n
    }

    #[tokio::test]
    async fn api_routes_require_auth() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let response = app
            .router()
            .oneshot(make_request("GET", "/api/contracts", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let response = app
            .router()
            .oneshot(make_request("GET", "/api/health", Some("not-a-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_succeeds_with_valid_token() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let response = app
            .router()
            .oneshot(make_request("GET", "/api/health", Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_then_list_round_trip() {
        let app = test_app(MockReviewGenerator::new("unused"));

        let req = multipart_request(&app.token, "lease.pdf", "application/pdf", b"%PDF-1.4 body");
        let response = app.router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["file_name"], "lease.pdf");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["file_size"], 13);

        let response = app
            .router()
            .oneshot(make_request("GET", "/api/contracts", Some(&app.token)))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["contracts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn contract_search_filters_by_file_name() {
        let app = test_app(MockReviewGenerator::new("unused"));
        for name in ["lease.pdf", "nda.pdf"] {
            let req = multipart_request(&app.token, name, "application/pdf", b"%PDF");
            let response = app.router().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .router()
            .oneshot(make_request(
                "GET",
                "/api/contracts?search=LEASE",
                Some(&app.token),
            ))
            .await
            .unwrap();
        let json = response_json(response).await;
        let contracts = json["contracts"].as_array().unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0]["file_name"], "lease.pdf");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_any_write() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let oversized = vec![0u8; MAX_UPLOAD_BYTES + 1];

        let req = multipart_request(&app.token, "huge.pdf", "application/pdf", &oversized);
        let response = app.router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        // Nothing stored, nothing recorded
        assert_eq!(file_count(app._tmp.path()), 0);
        let conn = app.db.lock().unwrap();
        assert!(contract::get_contracts_for_user(&conn, &app.user_id)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unsupported_upload_type_is_rejected() {
        let app = test_app(MockReviewGenerator::new("unused"));

        let req = multipart_request(&app.token, "notes.txt", "text/plain", b"plain text");
        let response = app.router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FILE_TYPE");
        assert_eq!(file_count(app._tmp.path()), 0);
    }

    #[tokio::test]
    async fn review_endpoint_runs_workflow_and_stores_result() {
        let app = test_app(MockReviewGenerator::new("## Executive Summary\nLow risk."));
        let id = seed_text_contract(&app, app.user_id, b"The parties agree as follows.");

        let uri = format!("/api/contracts/{id}/review");
        let response = app
            .router()
            .oneshot(make_request("POST", &uri, Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["content"].as_str().unwrap().contains("Executive Summary"));
        assert_eq!(app.generator.calls(), 1);

        // Stored review is served by GET without another adapter call
        let response = app
            .router()
            .oneshot(make_request("GET", &uri, Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert!(json["content"].as_str().unwrap().contains("Low risk"));
        assert_eq!(app.generator.calls(), 1);
    }

    #[tokio::test]
    async fn failed_review_returns_502() {
        let app = test_app(MockReviewGenerator::failing());
        let id = seed_text_contract(&app, app.user_id, b"body");

        let uri = format!("/api/contracts/{id}/review");
        let response = app
            .router()
            .oneshot(make_request("POST", &uri, Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = response_json(response).await;
        assert_eq!(json["error"]["message"], "Failed to review document");
    }

    #[tokio::test]
    async fn foreign_contract_is_indistinguishable_from_missing() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let other_user = Uuid::new_v4();
        let id = seed_text_contract(&app, other_user, b"not yours");

        let uri = format!("/api/contracts/{id}/review");
        let response = app
            .router()
            .oneshot(make_request("POST", &uri, Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.generator.calls(), 0);
    }

    #[tokio::test]
    async fn review_of_unreviewed_contract_is_404() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let id = seed_text_contract(&app, app.user_id, b"body");

        let uri = format!("/api/contracts/{id}/review");
        let response = app
            .router()
            .oneshot(make_request("GET", &uri, Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn document_generation_round_trip() {
        let app = test_app(MockReviewGenerator::new("# Mutual NDA\n1. Definitions..."));

        let body = r#"{"title":"Mutual NDA","description":"3-year term","document_type":"nda","jurisdiction":"Kenya","effective_date":"2026-10-01"}"#;
        let response = app
            .router()
            .oneshot(json_request("/api/documents", &app.token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["content"].as_str().unwrap().starts_with("# Mutual NDA"));
        assert_eq!(json["document_type"], "nda");

        let response = app
            .router()
            .oneshot(make_request("GET", "/api/documents", Some(&app.token)))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["documents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_document_title_is_rejected() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let body = r#"{"title":"  ","document_type":"policy"}"#;
        let response = app
            .router()
            .oneshot(json_request("/api/documents", &app.token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.generator.calls(), 0);
    }

    #[tokio::test]
    async fn report_filing_round_trip() {
        let app = test_app(MockReviewGenerator::new("unused"));

        let body = r#"{"title":"Tender irregularity","content":"Awarded without notice.","severity":"high"}"#;
        let response = app
            .router()
            .oneshot(json_request("/api/reports", &app.token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "pending_review");
        assert_eq!(json["severity"], "high");

        let response = app
            .router()
            .oneshot(make_request("GET", "/api/reports", Some(&app.token)))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["reports"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn report_status_progresses_through_patch() {
        let app = test_app(MockReviewGenerator::new("unused"));

        let body = r#"{"title":"Bribery allegation","content":"Details withheld.","severity":"medium"}"#;
        let response = app
            .router()
            .oneshot(json_request("/api/reports", &app.token, body))
            .await
            .unwrap();
        let created = response_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/reports/{id}/status"))
            .header("Authorization", format!("Bearer {}", app.token))
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"status":"under_investigation"}"#))
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "under_investigation");
    }

    #[tokio::test]
    async fn foreign_report_status_update_is_404() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/reports/{}/status", Uuid::new_v4()))
            .header("Authorization", format!("Bearer {}", app.token))
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"status":"resolved"}"#))
            .unwrap();
        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signed_url_serves_file_without_auth() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let key = app
            .ctx
            .store
            .store(&app.user_id, "scan.png", b"\x89PNG fake")
            .unwrap();
        let signed = app.ctx.store.create_signed_url(&key, 60).unwrap();

        let response = app
            .router()
            .oneshot(make_request("GET", &signed.url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "image/png"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"\x89PNG fake");
    }

    #[tokio::test]
    async fn expired_signed_url_returns_410() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let key = app
            .ctx
            .store
            .store(&app.user_id, "scan.png", b"bytes")
            .unwrap();
        let signed = app.ctx.store.create_signed_url(&key, 0).unwrap();

        let response = app
            .router()
            .oneshot(make_request("GET", &signed.url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app(MockReviewGenerator::new("unused"));
        let response = app
            .router()
            .oneshot(make_request("GET", "/api/nonexistent", Some(&app.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
