use axum::{
    routing::{get, post},
    Router,
    response::Html,
    extract::{State, Json},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use serde::Deserialize;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use heater_timer_calculator::{
    parse_datetime, ClockTime, HeaterClockSetting, HeaterTimerForm, TimerPreset,
};
use log::{error, info};

use crate::config::Config;

#[derive(Clone)]
pub struct WebState {
    pub config: Arc<Config>,
}

#[derive(Deserialize)]
pub struct CalculateRequest {
    current_time: Option<String>, // server local time when absent
    expected_start_time: Option<String>,
    reference: Option<String>, // preset id or time of day
}

pub fn create_router(state: WebState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .route("/", get(serve_form_page))
        .route("/api/presets", get(get_presets))
        .route("/api/calculate", post(calculate))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

pub async fn create_web_server(config: Arc<Config>) -> Result<()> {
    let listen_addr = config.listen_addr.clone();
    let app = create_router(WebState { config });

    info!("Starting web server on http://{}", listen_addr);
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_form_page(State(state): State<WebState>) -> Html<String> {
    let page = Path::new(&state.config.static_dir).join("index.html");
    match tokio::fs::read_to_string(&page).await {
        Ok(content) => Html(content),
        Err(e) => {
            error!("Error reading {}: {}", page.display(), e);
            Html("Error loading page".to_string())
        }
    }
}

async fn get_presets(State(state): State<WebState>) -> Json<serde_json::Value> {
    let presets: Vec<_> = TimerPreset::ALL
        .iter()
        .map(|p| serde_json::json!({
            "id": p.id(),
            "label": p.clock_time(),
        }))
        .collect();

    Json(serde_json::json!({
        "default": state.config.default_reference,
        "default_preset": TimerPreset::from_clock_time(state.config.default_reference),
        "presets": presets,
    }))
}

fn parse_reference(s: &str) -> Result<ClockTime> {
    if let Ok(preset) = s.parse::<TimerPreset>() {
        return Ok(preset.clock_time());
    }
    Ok(s.parse::<ClockTime>()?)
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

fn run_calculation(
    config: &Config,
    request: CalculateRequest,
    now: NaiveDateTime,
) -> Result<HeaterClockSetting> {
    let current_time = match non_empty(request.current_time) {
        Some(s) => parse_datetime(&s)?,
        None => now,
    };
    let reference = match non_empty(request.reference) {
        Some(s) => parse_reference(&s)?,
        None => config.default_reference,
    };
    let expected_start = non_empty(request.expected_start_time)
        .map(|s| parse_datetime(&s))
        .transpose()?;

    let mut form = HeaterTimerForm::with_reference(current_time, reference);
    form.set_expected_start(expected_start);
    Ok(form.calculate()?)
}

async fn calculate(
    State(state): State<WebState>,
    Json(request): Json<CalculateRequest>,
) -> Json<serde_json::Value> {
    match run_calculation(&state.config, request, Local::now().naive_local()) {
        Ok(setting) => Json(serde_json::json!({
            "success": true,
            "heater_clock": setting.clock,
            "offset_minutes": setting.offset_minutes,
        })),
        Err(e) => Json(serde_json::json!({
            "success": false,
            "error": e.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state(config: Config) -> WebState {
        WebState { config: Arc::new(config) }
    }

    fn request(current: Option<&str>, expected: Option<&str>, reference: Option<&str>) -> CalculateRequest {
        CalculateRequest {
            current_time: current.map(str::to_string),
            expected_start_time: expected.map(str::to_string),
            reference: reference.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_calculate_success() {
        let state = create_test_state(Config::default());
        let req = request(Some("2024-01-01T23:50"), Some("2024-01-02T00:10"), None);

        let Json(body) = calculate(State(state), Json(req)).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["heater_clock"], "12:10 AM");
        assert_eq!(body["offset_minutes"], 20);
    }

    #[tokio::test]
    async fn test_calculate_with_preset_and_time_references() {
        let state = create_test_state(Config::default());

        let req = request(Some("2024-01-01T09:00"), Some("2024-01-01T10:00"), Some("half-past-one"));
        let Json(body) = calculate(State(state.clone()), Json(req)).await;
        assert_eq!(body["heater_clock"], "12:30 AM");

        let req = request(Some("2024-01-01T09:00"), Some("2024-01-01T10:00"), Some("00:30"));
        let Json(body) = calculate(State(state), Json(req)).await;
        assert_eq!(body["heater_clock"], "11:30 PM");
    }

    #[tokio::test]
    async fn test_calculate_uses_configured_default_reference() {
        let state = create_test_state(Config {
            default_reference: ClockTime::HALF_PAST_ONE,
            ..Config::default()
        });
        let req = request(Some("2024-01-01T10:00"), Some("2024-01-01T10:00"), Some(""));

        let Json(body) = calculate(State(state), Json(req)).await;

        assert_eq!(body["heater_clock"], "1:30 AM");
        assert_eq!(body["offset_minutes"], 0);
    }

    #[tokio::test]
    async fn test_calculate_past_expected_time() {
        let state = create_test_state(Config::default());
        let req = request(Some("2024-01-01T10:00"), Some("2024-01-01T09:59"), None);

        let Json(body) = calculate(State(state), Json(req)).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Expected time must be in the future.");
        assert!(body.get("heater_clock").is_none());
    }

    #[tokio::test]
    async fn test_calculate_reports_bad_input() {
        let state = create_test_state(Config::default());

        let req = request(Some("yesterday"), Some("2024-01-01T09:59"), None);
        let Json(body) = calculate(State(state.clone()), Json(req)).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("yesterday"));

        let req = request(Some("2024-01-01T09:00"), None, None);
        let Json(body) = calculate(State(state.clone()), Json(req)).await;
        assert_eq!(body["error"], "Expected start time is not set.");

        let req = request(Some("2024-01-01T09:00"), Some("2024-01-01T10:00"), Some("13:00 PM"));
        let Json(body) = calculate(State(state), Json(req)).await;
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_missing_current_time_uses_now() {
        let now = NaiveDateTime::parse_from_str("2024-01-01 09:00", "%Y-%m-%d %H:%M").unwrap();
        let req = request(None, Some("2024-01-01T10:00"), None);

        let setting = run_calculation(&Config::default(), req, now).unwrap();

        assert_eq!(setting.offset_minutes, 60);
    }

    #[tokio::test]
    async fn test_get_presets() {
        let state = create_test_state(Config::default());

        let Json(body) = get_presets(State(state)).await;

        assert_eq!(body["default"], "12:30 AM");
        assert_eq!(body["default_preset"], "half-past-midnight");
        assert_eq!(body["presets"][0]["id"], "half-past-midnight");
        assert_eq!(body["presets"][1]["label"], "1:30 AM");
    }

    #[tokio::test]
    async fn test_serve_form_page() {
        let state = create_test_state(Config {
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
            ..Config::default()
        });
        let Html(page) = serve_form_page(State(state)).await;
        assert!(page.contains("/api/calculate"));

        let state = create_test_state(Config {
            static_dir: "/nonexistent".to_string(),
            ..Config::default()
        });
        let Html(page) = serve_form_page(State(state)).await;
        assert_eq!(page, "Error loading page");
    }

    #[tokio::test]
    async fn test_router_calculate_route() {
        let app = create_router(create_test_state(Config::default()));
        let body = serde_json::json!({
            "current_time": "2024-01-01T09:00",
            "expected_start_time": "2024-01-01T10:00",
            "reference": "1:30 AM",
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/calculate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["heater_clock"], "12:30 AM");
    }
}
