use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use risk_sentinel::error::AppError;
use risk_sentinel::workflows::transactions::{
    Disposition, RiskAssessment, RiskScreeningService, ScreeningRequest,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    #[serde(flatten)]
    pub(crate) assessment: RiskAssessment,
    pub(crate) disposition: Disposition,
    pub(crate) summary: String,
}

impl From<RiskAssessment> for EvaluateResponse {
    fn from(assessment: RiskAssessment) -> Self {
        let disposition = assessment.decision.disposition();
        let summary = assessment.decision.summary();
        Self {
            assessment,
            disposition,
            summary,
        }
    }
}

pub(crate) fn with_screening_routes(service: Arc<RiskScreeningService>) -> Router {
    Router::new()
        .route("/api/v1/risk/evaluate", post(evaluate_endpoint))
        .route("/api/v1/risk/denylist", get(denylist_endpoint))
        .with_state(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    State(service): State<Arc<RiskScreeningService>>,
    Json(request): Json<ScreeningRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let assessment = service.screen(&request)?;
    Ok(Json(EvaluateResponse::from(assessment)))
}

pub(crate) async fn denylist_endpoint(
    State(service): State<Arc<RiskScreeningService>>,
) -> Json<serde_json::Value> {
    let locations: Vec<&str> = service.denylist().iter().collect();
    Json(json!({ "locations": locations }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use risk_sentinel::workflows::transactions::{EventGuard, RiskRules};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let service = Arc::new(RiskScreeningService::new(
            EventGuard::default(),
            RiskRules::default(),
            ["Pyongyang", "Caracas"].into_iter().collect(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_screening_routes(service).layer(Extension(state))
    }

    fn evaluate_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/risk/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn evaluate_returns_decision_and_trail() {
        let request = evaluate_request(json!({
            "current": { "amount": "250", "timestamp": "2025-06-14T18:30:00Z", "location": "Rio de Janeiro" },
            "history": [
                { "amount": "40", "timestamp": "2025-06-14T18:20:00Z", "location": "São Paulo" }
            ]
        }));

        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["is_fraudulent"], true);
        assert_eq!(body["verification_required"], true);
        assert_eq!(body["is_blocked"], false);
        assert_eq!(body["risk_score"], 20);
        assert_eq!(body["disposition"], "verify");
        assert_eq!(body["hits"][0]["rule"], "rapid_location_change");
    }

    #[tokio::test]
    async fn evaluate_applies_service_denylist() {
        let request = evaluate_request(json!({
            "current": { "amount": "15000", "timestamp": "2025-06-14T18:30:00Z", "location": "Caracas" }
        }));

        let response = app(true).oneshot(request).await.expect("router responds");
        let body = json_body(response).await;

        assert_eq!(body["risk_score"], 100);
        assert_eq!(body["is_blocked"], true);
        assert_eq!(body["disposition"], "block");
    }

    #[tokio::test]
    async fn evaluate_rejects_unordered_history() {
        let request = evaluate_request(json!({
            "current": { "amount": "10", "timestamp": "2025-06-14T18:30:00Z", "location": "Lisbon" },
            "history": [
                { "amount": "1", "timestamp": "2025-06-14T18:25:00Z", "location": "Lisbon" },
                { "amount": "1", "timestamp": "2025-06-14T18:05:00Z", "location": "Lisbon" }
            ]
        }));

        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(response).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("oldest first"));
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let request = Request::builder()
            .uri("/ready")
            .body(Body::empty())
            .expect("request builds");

        let response = app(false).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn denylist_lists_configured_locations() {
        let request = Request::builder()
            .uri("/api/v1/risk/denylist")
            .body(Body::empty())
            .expect("request builds");

        let response = app(true).oneshot(request).await.expect("router responds");
        let body = json_body(response).await;

        assert_eq!(body["locations"], json!(["Caracas", "Pyongyang"]));
    }
}
