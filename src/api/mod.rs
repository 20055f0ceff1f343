mod error;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::core::{Engine, RawSimulationInput, SimulationInput, SimulationResult};
use crate::report::{PdfReportRenderer, ReportRenderer};
use crate::store::{InMemoryScenarioStore, JsonFileScenarioStore, ScenarioStore};

pub use error::ApiError;

/// Shared handler state. Every collaborator is immutable or internally synchronised.
#[derive(Clone)]
pub struct AppState {
    engine: Engine,
    store: Arc<dyn ScenarioStore>,
    renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn new(
        engine: Engine,
        store: Arc<dyn ScenarioStore>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            engine,
            store,
            renderer,
        }
    }

    /// Default engine constants, in-memory store and PDF reports.
    pub fn in_memory() -> Self {
        Self::new(
            Engine::default(),
            Arc::new(InMemoryScenarioStore::new()),
            Arc::new(PdfReportRenderer),
        )
    }

    fn compute(
        &self,
        raw: &RawSimulationInput,
    ) -> Result<(SimulationInput, SimulationResult), ApiError> {
        Ok(self.engine.project(raw)?)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// JSON file for scenarios; in-memory when absent.
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportPayload {
    email: Option<Value>,
    inputs: RawSimulationInput,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    base64: String,
    filename: String,
    mime: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/simulate", post(simulate_handler))
        .route(
            "/scenarios",
            get(list_scenarios_handler).post(create_scenario_handler),
        )
        .route(
            "/scenarios/:id",
            get(get_scenario_handler).delete(delete_scenario_handler),
        )
        .route("/report/generate", post(report_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let store: Arc<dyn ScenarioStore> = match &config.data_file {
        Some(path) => Arc::new(JsonFileScenarioStore::open(path).map_err(std::io::Error::other)?),
        None => Arc::new(InMemoryScenarioStore::new()),
    };
    let state = AppState::new(Engine::default(), store, Arc::new(PdfReportRenderer));

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, persistent = config.data_file.is_some(), "ROI HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RawSimulationInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(raw) = payload.map_err(bad_body)?;
    let (_, results) = state.compute(&raw)?;
    tracing::debug!(monthly_savings = results.monthly_savings, "simulation computed");
    Ok(json_response(StatusCode::OK, results))
}

async fn create_scenario_handler(
    State(state): State<AppState>,
    payload: Result<Json<RawSimulationInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(raw) = payload.map_err(bad_body)?;
    let name = raw
        .scenario_name()
        .ok_or_else(|| ApiError::BadRequest("scenario_name is required".to_string()))?
        .to_string();
    let (inputs, results) = state.compute(&raw)?;
    let store = Arc::clone(&state.store);
    let scenario = blocking(move || Ok(store.create(&name, inputs, results)?)).await?;
    tracing::info!(id = %scenario.id, name = %scenario.scenario_name, "scenario saved");
    Ok(json_response(StatusCode::CREATED, scenario))
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let scenarios = blocking(move || Ok(state.store.list()?)).await?;
    Ok(json_response(StatusCode::OK, scenarios))
}

async fn get_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let scenario = blocking(move || Ok(state.store.get(id)?)).await?;
    Ok(json_response(StatusCode::OK, scenario))
}

async fn delete_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    blocking(move || Ok(state.store.delete(id)?)).await?;
    tracing::info!(%id, "scenario deleted");
    Ok(json_response(
        StatusCode::OK,
        serde_json::json!({ "message": "Scenario deleted" }),
    ))
}

async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let email = match &payload.email {
        Some(Value::String(email)) if email.contains('@') && !email.trim().is_empty() => {
            email.trim().to_string()
        }
        _ => return Err(ApiError::BadRequest("a valid email is required".to_string())),
    };
    let (inputs, results) = state.compute(&payload.inputs)?;
    let renderer = Arc::clone(&state.renderer);
    let report = blocking(move || Ok(renderer.render(&email, &inputs, &results)?)).await?;
    tracing::info!(bytes = report.bytes.len(), "report generated");
    Ok(json_response(
        StatusCode::OK,
        ReportResponse {
            base64: STANDARD.encode(&report.bytes),
            filename: report.filename,
            mime: report.mime,
        },
    ))
}

/// Store and renderer calls may touch the filesystem; keep them off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::Persistence(format!("blocking task failed: {e}")))?
}

/// Unparseable ids cannot name a stored scenario.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid JSON payload: {}", rejection.body_text()))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validate;

    #[test]
    fn report_payload_defaults_missing_inputs() {
        let payload: ReportPayload =
            serde_json::from_str(r#"{"email": "a@b.co"}"#).expect("payload should parse");
        assert!(payload.inputs.monthly_invoice_volume.is_none());
        assert_eq!(payload.email, Some(Value::String("a@b.co".to_string())));
    }

    #[test]
    fn raw_input_accepts_camel_case_keys() {
        let raw: RawSimulationInput = serde_json::from_str(
            r#"{
              "scenarioName": "Pilot",
              "monthlyInvoiceVolume": 2000,
              "numApStaff": 3,
              "avgHoursPerInvoice": 0.17,
              "hourlyWage": 30,
              "errorRateManual": 0.5,
              "errorCost": 100,
              "timeHorizonMonths": 36
            }"#,
        )
        .expect("json should parse");
        assert_eq!(raw.scenario_name(), Some("Pilot"));
        let inputs = validate(&raw).expect("valid inputs");
        assert_eq!(inputs.num_ap_staff, 3.0);
        assert_eq!(inputs.one_time_implementation_cost, 0.0);
    }

    #[test]
    fn parse_id_maps_garbage_to_not_found() {
        assert!(matches!(parse_id("not-a-uuid"), Err(ApiError::NotFound)));
        assert!(parse_id(&Uuid::now_v7().to_string()).is_ok());
    }

    #[test]
    fn simulate_result_serializes_snake_case_fields() {
        let json = serde_json::to_string(&crate::core::simulate(&SimulationInput {
            monthly_invoice_volume: 1.0,
            num_ap_staff: 1.0,
            avg_hours_per_invoice: 1.0,
            hourly_wage: 1.0,
            error_rate_manual: 1.0,
            error_cost: 1.0,
            time_horizon_months: 1.0,
            one_time_implementation_cost: 0.0,
        }))
        .expect("result should serialize");
        for key in [
            "\"monthly_savings\"",
            "\"cumulative_savings\"",
            "\"net_savings\"",
            "\"payback_months\"",
            "\"roi_percentage\"",
            "\"automated_cost_per_invoice\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }
}
