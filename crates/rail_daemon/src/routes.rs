use crate::state::{log_events, AppState};
use crate::views::TrainsView;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use rail_core::{StartConfig, StatusReport};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

type JsonError = (StatusCode, Json<serde_json::Value>);

#[derive(Debug, Deserialize)]
pub struct FireAlarmRequest {
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for FireAlarmRequest {
    fn default() -> Self {
        Self {
            station: None,
            active: default_active(),
        }
    }
}

/// An empty body counts as `{}`; anything else must be valid JSON.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, JsonError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        tracing::warn!("rejected request body: {err}");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"ok": false, "error": err.to_string()})),
        )
    })
}

fn ok() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, "http://localhost:5173").expect("valid test origin")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin '{cors_origin}'"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Ok(Router::new()
        .route("/start", post(start_handler))
        .route("/status", get(status_handler))
        .route("/reset", post(reset_handler))
        .route("/trains", get(trains_handler))
        .route("/fire_alarm", post(fire_alarm_handler))
        .route("/api/v1/meta", get(meta_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn start_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, JsonError> {
    let config: StartConfig = parse_body(&body)?;
    let mut sim = app_state.sim.lock();
    let sim = &mut *sim;
    let events = sim
        .session
        .start(&config, &sim.content, &mut sim.rng, Instant::now());
    if sim.session.trains().is_empty() {
        tracing::warn!("run started with no buildable trains");
    }
    log_events(&events);
    Ok(ok())
}

pub async fn status_handler(State(app_state): State<AppState>) -> Json<StatusReport> {
    let mut sim = app_state.sim.lock();
    sim.advance_now();
    Json(sim.session.status())
}

pub async fn reset_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    app_state.sim.lock().session.reset(Instant::now());
    tracing::info!("run reset");
    ok()
}

pub async fn trains_handler(State(app_state): State<AppState>) -> Json<TrainsView> {
    let mut sim = app_state.sim.lock();
    sim.advance_now();
    Json(TrainsView::new(&sim.session, &sim.content))
}

pub async fn fire_alarm_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, JsonError> {
    let request: FireAlarmRequest = parse_body(&body)?;
    let Some(station) = request.station else {
        return Ok(ok());
    };
    let mut sim = app_state.sim.lock();
    let sim = &mut *sim;
    if sim
        .session
        .set_hazard(&station, request.active, &sim.content.network)
    {
        tracing::info!(%station, active = request.active, "fire alarm updated");
    } else {
        tracing::debug!(%station, "fire alarm for unknown station ignored");
    }
    Ok(ok())
}

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    Json(serde_json::json!({
        "run_id": sim.session.run_id(),
        "runs_started": sim.session.runs_started(),
        "seed": sim.seed,
        "network_version": sim.content.network.network_version,
        "running": sim.session.is_running(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SimState;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use parking_lot::Mutex;
    use rail_core::test_fixtures::{base_content, make_rng};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn make_test_state() -> AppState {
        AppState {
            sim: Arc::new(Mutex::new(SimState::new(base_content(), make_rng(), 42))),
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_status_when_idle() {
        let app = make_router(make_test_state());
        let (status, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["running"], false);
        assert_eq!(json["active_trains"], 0);
        assert_eq!(json["utility_mode"], "Time");
        assert!(json["train_times"]["Train 3"].is_number());
    }

    #[tokio::test]
    async fn test_start_then_status_reports_running() {
        let app = make_router(make_test_state());
        let body = r#"{"train1": {"start": "Lahore", "dest": "Gujranwala"}, "risk_mode": "Comfort"}"#;
        let (status, json) = send(&app, "POST", "/start", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);

        let (_, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(json["running"], true);
        assert_eq!(json["active_trains"], 1);
        assert_eq!(json["risk_mode"], "Comfort");
        let efficiency = json["ai_efficiency"].as_f64().unwrap();
        assert!((efficiency - 0.88).abs() < 1e-9);
    }

    const LAHORE_TO_GUJRANWALA: &str = r#"{"train1": {"start": "Lahore", "dest": "Gujranwala"}}"#;

    #[tokio::test]
    async fn test_trains_query_advances_clock() {
        let app = make_router(make_test_state());
        send(&app, "POST", "/start", LAHORE_TO_GUJRANWALA).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (_, json) = send(&app, "GET", "/trains", "").await;
        let train = &json["trains"][0];
        assert!(train["progress"].as_f64().unwrap() > 0.0, "{train}");
        assert!(train["elapsed_time"].as_f64().unwrap() > 0.0, "{train}");
        assert!(train["cost"].as_f64().unwrap() > 0.0, "{train}");
        assert!(train["path"].as_array().unwrap().len() >= 2, "{train}");
    }

    #[tokio::test]
    async fn test_status_query_advances_clock() {
        let app = make_router(make_test_state());
        send(&app, "POST", "/start", LAHORE_TO_GUJRANWALA).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (_, json) = send(&app, "GET", "/status", "").await;
        assert!(json["train_times"]["Train 1"].as_f64().unwrap() > 0.0, "{json}");
        assert!(json["train_distances"]["Train 1"].as_f64().unwrap() > 0.0, "{json}");
        assert!(json["total_distance"].as_f64().unwrap() > 0.0, "{json}");
        assert_eq!(json["train_times"]["Train 2"], 0.0);
    }

    #[tokio::test]
    async fn test_start_with_empty_body_is_idle() {
        let app = make_router(make_test_state());
        let (status, _) = send(&app, "POST", "/start", "").await;
        assert_eq!(status, StatusCode::OK);
        let (_, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(json["running"], false);
    }

    #[tokio::test]
    async fn test_start_with_malformed_body_is_rejected() {
        let app = make_router(make_test_state());
        let (status, json) = send(&app, "POST", "/start", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
    }

    #[tokio::test]
    async fn test_fire_alarm_redirects_next_run() {
        let app = make_router(make_test_state());
        send(&app, "POST", "/fire_alarm", r#"{"station": "Islamabad Station"}"#).await;
        send(
            &app,
            "POST",
            "/start",
            r#"{"train1": {"start": "Lahore", "dest": "Islamabad Station"}}"#,
        )
        .await;

        let (_, json) = send(&app, "GET", "/trains", "").await;
        assert_eq!(json["fire_alarms"], serde_json::json!(["Islamabad Station"]));
        let train = &json["trains"][0];
        assert_eq!(train["name"], "Train 1");
        assert_eq!(train["start_city"], "Lahore");
        assert_eq!(train["dest_city"], "Rawalpindi");
        assert_eq!(train["color"], "#ef4444");
        assert!(!train["path"].as_array().unwrap().is_empty());
        assert_eq!(train["latlng"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fire_alarm_can_be_cleared_and_ignores_unknown() {
        let app = make_router(make_test_state());
        send(&app, "POST", "/fire_alarm", r#"{"station": "Sindh", "active": true}"#).await;
        send(&app, "POST", "/fire_alarm", r#"{"station": "Atlantis"}"#).await;
        let (_, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(json["fire_alarms"], serde_json::json!(["Sindh"]));

        let (status, _) =
            send(&app, "POST", "/fire_alarm", r#"{"station": "Sindh", "active": false}"#).await;
        assert_eq!(status, StatusCode::OK);
        let (_, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(json["fire_alarms"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_trains_lists_cities() {
        let app = make_router(make_test_state());
        let (status, json) = send(&app, "GET", "/trains", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cities"].as_object().unwrap().len(), 7);
        assert_eq!(json["cities"]["Lahore"], serde_json::json!([31.514, 74.354]));
        assert!(json["trains"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_stops_run() {
        let app = make_router(make_test_state());
        send(
            &app,
            "POST",
            "/start",
            r#"{"train1": {"start": "Lahore", "dest": "Gujranwala"}}"#,
        )
        .await;
        let (status, json) = send(&app, "POST", "/reset", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);

        let (_, json) = send(&app, "GET", "/status", "").await;
        assert_eq!(json["running"], false);
        assert_eq!(json["total_distance"], 0.0);
        let (_, json) = send(&app, "GET", "/trains", "").await;
        assert!(json["trains"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_meta_reports_run_id() {
        let app = make_router(make_test_state());
        let (_, json) = send(&app, "GET", "/api/v1/meta", "").await;
        assert!(json["run_id"].is_null());
        assert_eq!(json["seed"], 42);
        assert_eq!(json["network_version"], "test");

        send(&app, "POST", "/start", "{}").await;
        let (_, json) = send(&app, "GET", "/api/v1/meta", "").await;
        assert!(json["run_id"].is_string());
        assert_eq!(json["runs_started"], 1);
    }

    #[test]
    fn test_invalid_cors_origin_is_an_error() {
        assert!(make_router_with_cors(make_test_state(), "bad\norigin").is_err());
    }
}
