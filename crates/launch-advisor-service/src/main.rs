use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use launch_advisor_api::{
    EvaluateRequest, EvaluationReport, LaunchAdvisorApi, API_CONTRACT_VERSION,
};
use launch_advisor_core::{rule_infos, RuleInfo, RuleSetVariant};
use serde::{Deserialize, Serialize};

const SERVICE_CONTRACT_VERSION: &str = "service.v1";

#[derive(Debug, Clone)]
struct ServiceState {
    api: LaunchAdvisorApi,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceEnvelope<T>
where
    T: Serialize,
{
    service_contract_version: &'static str,
    api_contract_version: &'static str,
    data: T,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceError {
    service_contract_version: &'static str,
    error: String,
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct RulesetQuery {
    ruleset: Option<RuleSetVariant>,
}

#[derive(Debug, Clone, Serialize)]
struct RulesetResponse {
    ruleset_version: &'static str,
    rules: Vec<RuleInfo>,
}

#[derive(Debug, Parser)]
#[command(name = "launch-advisor-service")]
#[command(about = "Local HTTP service for the launch advisor")]
struct Args {
    #[arg(long, default_value = "127.0.0.1:4020")]
    bind: SocketAddr,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        (status, Json(self)).into_response()
    }
}

impl ServiceState {
    fn error(message: impl Into<String>) -> ServiceError {
        ServiceError { service_contract_version: SERVICE_CONTRACT_VERSION, error: message.into() }
    }
}

fn envelope<T>(data: T) -> ServiceEnvelope<T>
where
    T: Serialize,
{
    ServiceEnvelope {
        service_contract_version: SERVICE_CONTRACT_VERSION,
        api_contract_version: API_CONTRACT_VERSION,
        data,
    }
}

fn app(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ruleset", get(ruleset))
        .route("/v1/evaluate", post(evaluate))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let state = ServiceState { api: LaunchAdvisorApi::default() };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn health() -> Json<ServiceEnvelope<HealthResponse>> {
    Json(envelope(HealthResponse { status: "ok" }))
}

async fn ruleset(
    Query(query): Query<RulesetQuery>,
) -> Json<ServiceEnvelope<RulesetResponse>> {
    let variant = query.ruleset.unwrap_or_default();
    Json(envelope(RulesetResponse {
        ruleset_version: variant.version(),
        rules: rule_infos(variant),
    }))
}

async fn evaluate(
    State(state): State<ServiceState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ServiceEnvelope<EvaluationReport>>, ServiceError> {
    let report =
        state.api.evaluate(request).map_err(|err| ServiceState::error(err.to_string()))?;
    Ok(Json(envelope(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        app(ServiceState { api: LaunchAdvisorApi::default() })
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = match to_bytes(response.into_body(), 1024 * 1024).await {
            Ok(bytes) => bytes,
            Err(err) => panic!("failed to read response body: {err}"),
        };
        let body = match String::from_utf8(bytes.to_vec()) {
            Ok(body) => body,
            Err(err) => panic!("response body is not UTF-8: {err}"),
        };
        match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(err) => panic!("response body is not JSON: {err}; body={body}"),
        }
    }

    fn nominal_payload() -> serde_json::Value {
        serde_json::json!({
            "fuel_level": 100,
            "main_engine": "nominal",
            "tank_pressure": "ok",
            "navigation": "ok",
            "communication": "ok",
            "electrical": "ok",
            "control_software": "ok",
            "precipitation_probability": 0,
            "weather": "clear",
            "sensors": "ok",
            "aerodynamics": "ok"
        })
    }

    async fn post_evaluate(router: Router, payload: &serde_json::Value) -> Response {
        match router
            .oneshot(
                Request::builder()
                    .uri("/v1/evaluate")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(payload.to_string()))
                    .unwrap_or_else(|err| panic!("failed to build evaluate request: {err}")),
            )
            .await
        {
            Ok(response) => response,
            Err(err) => panic!("evaluate request failed: {err}"),
        }
    }

    // Test IDs: TSVC-001
    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let response = match test_router()
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .method("GET")
                    .body(axum::body::Body::empty())
                    .unwrap_or_else(|err| panic!("failed to build request: {err}")),
            )
            .await
        {
            Ok(response) => response,
            Err(err) => panic!("router request failed: {err}"),
        };
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        assert_eq!(
            value.get("service_contract_version").and_then(serde_json::Value::as_str),
            Some(SERVICE_CONTRACT_VERSION)
        );
        assert_eq!(
            value
                .get("data")
                .and_then(|data| data.get("status"))
                .and_then(serde_json::Value::as_str),
            Some("ok")
        );
    }

    // Test IDs: TSVC-002
    #[tokio::test]
    async fn evaluate_endpoint_returns_go_for_nominal_snapshot() {
        let response = post_evaluate(test_router(), &nominal_payload()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        let data = value
            .get("data")
            .unwrap_or_else(|| panic!("missing data in response: {value}"));
        assert_eq!(
            data.get("disposition").and_then(serde_json::Value::as_str),
            Some("go")
        );
        assert_eq!(
            data.get("summary").and_then(serde_json::Value::as_str),
            Some("INFO: All systems nominal, ready for launch")
        );
    }

    // Test IDs: TSVC-003
    #[tokio::test]
    async fn evaluate_endpoint_returns_no_go_with_trace() {
        let mut payload = nominal_payload();
        payload["fuel_level"] = serde_json::json!(90);
        payload["electrical"] = serde_json::json!("fail");
        payload["precipitation_probability"] = serde_json::json!(45);

        let response = post_evaluate(test_router(), &payload).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        let data = value
            .get("data")
            .unwrap_or_else(|| panic!("missing data in response: {value}"));
        assert_eq!(
            data.get("disposition").and_then(serde_json::Value::as_str),
            Some("no_go")
        );

        let trace = data
            .get("trace")
            .and_then(serde_json::Value::as_array)
            .unwrap_or_else(|| panic!("missing trace in response: {value}"));
        let rules = trace
            .iter()
            .filter_map(|entry| entry.get("rule").and_then(serde_json::Value::as_str))
            .collect::<Vec<_>>();
        assert!(rules.contains(&"lightning_storm_risk"));
        assert!(rules.contains(&"low_fuel"));
        assert!(rules.contains(&"abort_review"));
    }

    // Test IDs: TSVC-004
    #[tokio::test]
    async fn evaluate_endpoint_rejects_out_of_domain_snapshot() {
        let mut payload = nominal_payload();
        payload["fuel_level"] = serde_json::json!(120);

        let response = post_evaluate(test_router(), &payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = response_json(response).await;
        let error = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_else(|| panic!("missing error in response: {value}"));
        assert!(error.contains("fuel_level MUST be within 0..=100"));
    }

    // Test IDs: TSVC-005
    #[tokio::test]
    async fn ruleset_endpoint_lists_both_variants() {
        let response = match test_router()
            .oneshot(
                Request::builder()
                    .uri("/v1/ruleset?ruleset=baseline")
                    .method("GET")
                    .body(axum::body::Body::empty())
                    .unwrap_or_else(|err| panic!("failed to build request: {err}")),
            )
            .await
        {
            Ok(response) => response,
            Err(err) => panic!("router request failed: {err}"),
        };
        assert_eq!(response.status(), StatusCode::OK);

        let value = response_json(response).await;
        let data = value
            .get("data")
            .unwrap_or_else(|| panic!("missing data in response: {value}"));
        assert_eq!(
            data.get("ruleset_version").and_then(serde_json::Value::as_str),
            Some("ruleset.baseline.v1")
        );
        assert_eq!(
            data.get("rules").and_then(serde_json::Value::as_array).map(Vec::len),
            Some(14)
        );
    }
}
