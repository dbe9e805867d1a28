//! HTTP tests for the passport API router.
//!
//! Each test lays out a temp data directory, builds the router around it and
//! drives single requests through `oneshot`. Grid files are empty placeholders
//! whose contents come from an in-memory NetCDF reader.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use netcdf_parser::{MemoryDataset, MemoryReader, VariableHeader};
use serde_json::{json, Value};
use tower::ServiceExt;

use passport_api::{build_router, ApiConfig, AppState};
use test_utils::{
    ascending_axis, assert_approx_eq, descending_axis, imerg_dataset, lat_lon_dataset,
    sample_current, sample_historical, PassportFixture, CURRENT_FILE,
};

const GRID_FILE: &str = "3B-DAY.MS.MRG.3IMERG.20250823-S000000-E235959.V07B.nc4";

// ============================================================================
// Helpers
// ============================================================================

fn app(fixture: &PassportFixture) -> Router {
    app_with(fixture, MemoryReader::new(), None)
}

fn app_with(fixture: &PassportFixture, reader: MemoryReader, api_key: Option<&str>) -> Router {
    let config = ApiConfig::default()
        .with_data_dir(fixture.path())
        .with_api_key(api_key.map(str::to_string));
    build_router(Arc::new(AppState::with_reader(config, Arc::new(reader))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    get_with_auth(app, uri, None).await
}

async fn get_with_auth(app: Router, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null))
    };
    (status, json)
}

fn risk_uri(lat: f64, lon: f64) -> String {
    format!("/api/risk/very-wet?lat={}&lon={}&date=2025-08-23", lat, lon)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = PassportFixture::empty();
    let (status, body) = get(app(&fixture), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "passport-api");
}

#[tokio::test]
async fn test_ready_reports_missing_snapshots() {
    let fixture = PassportFixture::empty().with_current(&sample_current());
    let (status, body) = get(app(&fixture), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
    assert_eq!(body["current_snapshot"], "ok");
    assert_eq!(body["historical_snapshot"], "missing");
    assert_eq!(body["grid_dir"], "ok");

    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

// ============================================================================
// Current snapshot and buttons
// ============================================================================

#[tokio::test]
async fn test_today_returns_snapshot_verbatim() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/passport/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sample_current());
}

#[tokio::test]
async fn test_heat_button() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/buttons/heat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"flag": true, "value": 36.0, "threshold": 35.0}));
}

#[tokio::test]
async fn test_cold_button_alarms_at_or_below() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/buttons/cold").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"flag": true, "value": 5.0, "threshold": 10.0}));
}

#[tokio::test]
async fn test_very_wet_and_windy_buttons() {
    let fixture = PassportFixture::with_samples();

    let (_, body) = get(app(&fixture), "/api/buttons/very-wet").await;
    assert_eq!(body, json!({"flag": false, "value": 3.2, "threshold": 20.0}));

    // Equal to threshold raises the flag
    let (_, body) = get(app(&fixture), "/api/buttons/windy").await;
    assert_eq!(body, json!({"flag": true, "value": 12.0, "threshold": 12.0}));
}

#[tokio::test]
async fn test_unknown_button_is_not_found() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/buttons/foggy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_missing_metric_key_is_not_found() {
    let fixture = PassportFixture::empty().with_current(&json!({
        "metrics": {"tmax_c": 36.0},
        "thresholds": {}
    }));
    let (status, body) = get(app(&fixture), "/api/buttons/heat").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Threshold heat_c not found");
}

#[tokio::test]
async fn test_non_numeric_metric_is_processing_error() {
    let fixture = PassportFixture::empty().with_current(&json!({
        "metrics": {"tmax_c": "scorching"},
        "thresholds": {"heat_c": 35.0}
    }));
    let (status, body) = get(app(&fixture), "/api/buttons/heat").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["type"], "processing-error");
}

#[tokio::test]
async fn test_corrupt_snapshot_is_processing_error() {
    let fixture = PassportFixture::empty();
    fixture.write_raw(CURRENT_FILE, "{\"metrics\": ");
    let (status, _) = get(app(&fixture), "/api/passport/today").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_current_file_is_not_found_everywhere() {
    let fixture = PassportFixture::empty().with_historical(&sample_historical());

    for uri in [
        "/api/passport/today",
        "/api/passport/combined",
        "/api/buttons/very-wet",
        "/api/buttons/windy",
        "/api/buttons/heat",
        "/api/buttons/cold",
    ] {
        let (status, body) = get(app(&fixture), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["detail"], "Current passport file not found", "{uri}");
    }
}

// ============================================================================
// Historical buttons
// ============================================================================

#[tokio::test]
async fn test_historical_very_wet() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/historical/very_wet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"metric": "very_wet", "probability_percent": 23.7, "threshold": 10})
    );
}

#[tokio::test]
async fn test_historical_zero_and_null_are_distinct() {
    let fixture = PassportFixture::with_samples();

    let (_, windy) = get(app(&fixture), "/api/historical/windy").await;
    assert_eq!(windy["probability_percent"], json!(0.0));
    assert_eq!(windy["threshold"], json!(12.5));

    let (status, cold) = get(app(&fixture), "/api/historical/cold").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cold["probability_percent"].is_null());
    assert_eq!(cold["threshold"], json!(10));
}

#[tokio::test]
async fn test_historical_tolerates_non_category_keys() {
    let mut historical = sample_historical();
    historical["buttons"]["generated_by"] = json!("climatology-v2");
    let fixture = PassportFixture::empty()
        .with_current(&sample_current())
        .with_historical(&historical);

    let (status, body) = get(app(&fixture), "/api/historical/very_wet").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["probability_percent"], 23.7);

    let (status, body) = get(app(&fixture), "/api/passport/combined").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_history"]["very_wet"]["probability_percent"], 23.7);
}

#[tokio::test]
async fn test_missing_historical_file_is_not_found_everywhere() {
    let fixture = PassportFixture::empty().with_current(&sample_current());

    for uri in [
        "/api/passport/combined",
        "/api/historical/very_wet",
        "/api/historical/windy",
        "/api/historical/heat",
        "/api/historical/cold",
    ] {
        let (status, body) = get(app(&fixture), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["detail"], "Historical passport file not found", "{uri}");
    }
}

// ============================================================================
// Combined passport
// ============================================================================

#[tokio::test]
async fn test_combined_passport() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), "/api/passport/combined").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["event_history"]["very_wet"]["probability_percent"], 23.7);
    assert!(body["event_history"]["cold"]["probability_percent"].is_null());
    assert_eq!(body["event_history"]["heat"]["probability_percent"], 50.0);

    assert_eq!(body["live_forecast"]["heat"]["flag"], true);
    assert_eq!(body["live_forecast"]["cold"]["flag"], true);
    assert_eq!(body["live_forecast"]["very_wet"]["flag"], false);
    assert_eq!(body["live_forecast"]["windy"]["value"], 12.0);
}

// ============================================================================
// Gridded risk
// ============================================================================

#[tokio::test]
async fn test_risk_over_imerg_grid() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let reader = MemoryReader::new().with_dataset(GRID_FILE, imerg_dataset(-23.5, -46.5, |_, _| 12.0));

    let (status, body) = get(app_with(&fixture, reader, None), &risk_uri(-23.5, -46.5)).await;
    assert_eq!(status, StatusCode::OK);
    assert_approx_eq!(body["rain_mm_day"].as_f64().unwrap(), 12.0, 1e-9);
    assert_eq!(body["very_wet"], true);
    assert_eq!(body["threshold_mm"], 10.0);
    // 25 km is about 0.225 degrees: four 0.1 degree cells per axis
    assert_eq!(body["valid_pixels"], 16);
    assert_eq!(body["meta"]["file_used"], GRID_FILE);
    assert_eq!(body["meta"]["var"], "precipitation");
    assert_eq!(body["meta"]["data_source"], "NASA GPM IMERG Final (daily)");
}

#[tokio::test]
async fn test_risk_threshold_and_radius_parameters() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let reader = MemoryReader::new().with_dataset(GRID_FILE, imerg_dataset(0.0, 0.0, |_, _| 12.0));

    let uri = "/api/risk/very-wet?lat=0&lon=0&date=2025-08-23&radius_km=8&threshold_mm=12.5";
    let (status, body) = get(app_with(&fixture, reader, None), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["very_wet"], false);
    assert_eq!(body["threshold_mm"], 12.5);
    // 8 km is about 0.072 degrees: the two cells either side of the point
    assert_eq!(body["valid_pixels"], 4);
}

#[tokio::test]
async fn test_risk_all_fill_box_is_null_not_error() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let reader = MemoryReader::new().with_dataset(GRID_FILE, imerg_dataset(0.0, 0.0, |_, _| f64::NAN));

    let (status, body) = get(app_with(&fixture, reader, None), &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["rain_mm_day"].is_null());
    assert_eq!(body["very_wet"], false);
    assert_eq!(body["valid_pixels"], 0);
}

#[tokio::test]
async fn test_risk_same_answer_for_descending_latitudes() {
    let lons = ascending_axis(10.0, 12.0, 0.25);
    let rain = |lat: f64, lon: f64| lat.abs() + lon;

    let asc = lat_lon_dataset(ascending_axis(-1.0, 1.0, 0.25), lons.clone(), rain);
    let desc = lat_lon_dataset(descending_axis(1.0, -1.0, 0.25), lons, rain);

    let mut results = Vec::new();
    for dataset in [asc, desc] {
        let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
        let reader = MemoryReader::new().with_dataset(GRID_FILE, dataset);
        let uri = "/api/risk/very-wet?lat=0&lon=11&date=2025-08-23&radius_km=60";
        let (status, body) = get(app_with(&fixture, reader, None), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["valid_pixels"].as_u64().unwrap() > 0);
        results.push(body);
    }

    assert_eq!(results[0]["valid_pixels"], results[1]["valid_pixels"]);
    assert_approx_eq!(
        results[0]["rain_mm_day"].as_f64().unwrap(),
        results[1]["rain_mm_day"].as_f64().unwrap(),
        1e-12
    );
}

#[tokio::test]
async fn test_risk_reports_fallback_variable() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let dataset = MemoryDataset::new()
        .coordinate("latitude", vec![0.05, -0.05])
        .coordinate("longitude", vec![-0.05, 0.05])
        .variable(
            VariableHeader::new("HQprecipitation", &["latitude", "longitude"]),
            vec![30.0, 30.0, 30.0, 30.0],
        );
    let reader = MemoryReader::new().with_dataset(GRID_FILE, dataset);

    let (status, body) = get(app_with(&fixture, reader, None), &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["var"], "HQprecipitation");
    assert_eq!(body["very_wet"], true);
    assert_eq!(body["valid_pixels"], 4);
}

#[tokio::test]
async fn test_risk_missing_grid_file_is_not_found() {
    let fixture = PassportFixture::with_samples();
    let (status, body) = get(app(&fixture), &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], format!("data not found: {}", GRID_FILE));
}

#[tokio::test]
async fn test_risk_unreadable_grid_is_processing_error() {
    // File exists but the reader does not know it
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let (status, body) = get(app(&fixture), &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("processing error:"));
}

#[tokio::test]
async fn test_risk_validation_errors() {
    let fixture = PassportFixture::with_samples();

    for uri in [
        "/api/risk/very-wet?lat=91&lon=0&date=2025-08-23",
        "/api/risk/very-wet?lat=0&lon=181&date=2025-08-23",
        "/api/risk/very-wet?lat=0&lon=0&date=23-08-2025",
        "/api/risk/very-wet?lat=0&lon=0&date=2025-02-30",
        "/api/risk/very-wet?lat=0&lon=0&date=2025-08-23&radius_km=0",
        "/api/risk/very-wet?lat=0&lon=0&date=2025-08-23&radius_km=150",
        "/api/risk/very-wet?lat=0&lon=0&date=2025-08-23&threshold_mm=-1",
        "/api/risk/very-wet?lat=abc&lon=0&date=2025-08-23",
        "/api/risk/very-wet?lon=0&date=2025-08-23",
    ] {
        let (status, body) = get(app(&fixture), uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["status"], 422, "{uri}");
    }
}

// ============================================================================
// Bearer gate
// ============================================================================

#[tokio::test]
async fn test_gate_open_without_api_key() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let reader = MemoryReader::new().with_dataset(GRID_FILE, imerg_dataset(0.0, 0.0, |_, _| 1.0));

    let (status, _) = get(app_with(&fixture, reader, None), &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_gate_accepts_exact_bearer() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);
    let reader = MemoryReader::new().with_dataset(GRID_FILE, imerg_dataset(0.0, 0.0, |_, _| 1.0));

    let app = app_with(&fixture, reader, Some("secret"));
    let (status, _) = get_with_auth(app, &risk_uri(0.0, 0.0), Some("Bearer secret")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_gate_rejects_everything_else() {
    let fixture = PassportFixture::with_samples().with_grid_file(GRID_FILE);

    for auth in [None, Some("Bearer wrong"), Some("secret"), Some("Bearer secret ")] {
        let app = app_with(&fixture, MemoryReader::new(), Some("secret"));
        let (status, body) = get_with_auth(app, &risk_uri(0.0, 0.0), auth).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{auth:?}");
        assert_eq!(body["status"], 401);
    }
}

#[tokio::test]
async fn test_gate_leaves_snapshot_routes_open() {
    let fixture = PassportFixture::with_samples();
    let app = app_with(&fixture, MemoryReader::new(), Some("secret"));
    let (status, _) = get(app, "/api/buttons/heat").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_api_key_leaves_gate_open() {
    let fixture = PassportFixture::with_samples();
    let app = app_with(&fixture, MemoryReader::new(), Some(""));
    // Gate passes; the grid file is missing
    let (status, _) = get(app, &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_override_table_selects_irregular_file() {
    let irregular = "3B-DAY.MS.MRG.3IMERG.20250823-S000000-E235959.V07B.nc4.nc4";
    let fixture = PassportFixture::with_samples().with_grid_file(irregular);
    let reader =
        MemoryReader::new().with_dataset(irregular, imerg_dataset(0.0, 0.0, |_, _| 3.0));

    let mut config = ApiConfig::default().with_data_dir(fixture.path());
    config
        .grid
        .file_overrides
        .insert("2025-08-23".to_string(), irregular.to_string());
    let app = build_router(Arc::new(AppState::with_reader(config, Arc::new(reader))));

    let (status, body) = get(app, &risk_uri(0.0, 0.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["file_used"], irregular);
    assert_eq!(body["very_wet"], false);
}
