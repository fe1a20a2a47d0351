use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use carlos_dashboard::application::carlos_api::CarlosApi;
use carlos_dashboard::application::dashboard_service::DashboardService;
use carlos_dashboard::application::device_store::DeviceStore;
use carlos_dashboard::application::streaming_service::StreamingDashboardService;
use carlos_dashboard::infrastructure::config::{AuthSettings, ChartSettings};
use carlos_dashboard::infrastructure::http_api::HttpCarlosApi;
use carlos_dashboard::presentation::{app_state::AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEVICE: &str = "0b7e3c52-91f4-4a52-8f0e-5d2f6a8c9b11";

async fn mock_device_api() -> MockServer {
    let server = MockServer::start().await;
    let device = json!({
        "deviceId": DEVICE,
        "displayName": "Balcony",
        "description": "Herbs",
        "registeredAt": "2024-03-01T00:00:00Z",
        "lastSeenAt": null,
        "isOnline": true
    });

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([device.clone()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE}/drivers")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "deviceId": DEVICE,
                "driverIdentifier": "sht30",
                "displayName": "Climate",
                "direction": "input",
                "driverModule": "sht3x",
                "isVisibleOnDashboard": true
            },
            {
                "deviceId": DEVICE,
                "driverIdentifier": "debug",
                "displayName": "Debug",
                "direction": "input",
                "driverModule": "debug",
                "isVisibleOnDashboard": false
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/devices/{DEVICE}/drivers/sht30/signals")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timeseriesId": 1,
                "deviceId": DEVICE,
                "driverIdentifier": "sht30",
                "displayName": "Temperature",
                "unitOfMeasurement": 200,
                "isVisibleOnDashboard": true
            },
            {
                "timeseriesId": 2,
                "deviceId": DEVICE,
                "driverIdentifier": "sht30",
                "displayName": "Humidity",
                "unitOfMeasurement": 300,
                "isVisibleOnDashboard": true
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/timeseries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timeseriesId": 1,
                "timestamps": ["2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z"],
                "values": [21.0, 22.5]
            },
            {
                "timeseriesId": 2,
                "timestamps": ["2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z"],
                "values": [55.0, null]
            }
        ])))
        .mount(&server)
        .await;

    server
}

fn app(server: &MockServer) -> Router {
    let api: Arc<dyn CarlosApi> = Arc::new(HttpCarlosApi::new(&server.uri(), None));
    let store = Arc::new(DeviceStore::new(api.clone()));
    let dashboard_service = DashboardService::new(store.clone(), api.clone());

    router(Arc::new(AppState {
        streaming_service: StreamingDashboardService::new(store.clone(), api, dashboard_service.clone()),
        dashboard_service,
        store,
        charts: ChartSettings::default(),
        auth: AuthSettings {
            domain: "carlos.eu.auth0.com".to_string(),
            client_id: "dashboard".to_string(),
            audience: None,
        },
    }))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, bytes::Bytes) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, to_bytes(response.into_body(), usize::MAX).await.unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_check_answers_ok() {
    let server = MockServer::start().await;
    let (status, body) = get(&app(&server), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn auth_config_is_passed_through() {
    let server = MockServer::start().await;
    let (status, body) = get_json(&app(&server), "/auth/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientId"], "dashboard");
    assert_eq!(body["audience"], Value::Null);
}

#[tokio::test]
async fn devices_are_listed() {
    let server = mock_device_api().await;
    let (status, body) = get_json(&app(&server), "/devices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["displayName"], "Balcony");
}

#[tokio::test]
async fn unknown_device_is_not_found() {
    let server = mock_device_api().await;
    let (status, body) = get_json(
        &app(&server),
        "/devices/00000000-0000-0000-0000-000000000001",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn dashboard_has_one_chart_per_visible_signal() {
    let server = mock_device_api().await;
    let app = app(&server);

    let (status, body) = get_json(
        &app,
        &format!("/devices/{DEVICE}/dashboard?hours=12&width=400&height=200"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device"]["displayName"], "Balcony");

    let charts = body["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0]["title"], "Temperature");
    assert_eq!(charts[0]["unitSymbol"], "°C");
    assert_eq!(charts[0]["latestValue"], "22.5");
    assert_eq!(charts[0]["yAxis"]["min"], 0.0);
    assert_eq!(charts[0]["yAxis"]["max"], 40.0);
    assert_eq!(charts[1]["title"], "Humidity");
    assert_eq!(charts[1]["yAxis"]["max"], 100.0);

    let (status, _) = get_json(&app, &format!("/devices/{DEVICE}/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    let driver_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == format!("/devices/{DEVICE}/drivers"))
        .count();
    assert_eq!(driver_requests, 1);
}

#[tokio::test]
async fn dashboard_rejects_ranges_over_thirty_days() {
    let server = mock_device_api().await;
    let (status, body) = get_json(
        &app(&server),
        &format!("/devices/{DEVICE}/dashboard?hours=1000"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("30 days"));
}

#[tokio::test]
async fn dashboard_rejects_unrepresentable_hours() {
    let server = mock_device_api().await;
    let app = app(&server);

    for uri in [
        format!("/devices/{DEVICE}/dashboard?hours=10000000000"),
        format!("/devices/{DEVICE}/dashboard/stream?hours=-10000000000"),
    ] {
        let (status, body) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }
}

#[tokio::test]
async fn dashboard_stream_frames() {
    let server = mock_device_api().await;
    let response = app(&server)
        .oneshot(
            Request::builder()
                .uri(format!("/devices/{DEVICE}/dashboard/stream?hours=6"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut messages = Vec::new();
    let mut rest = &body[..];
    while !rest.is_empty() {
        let length = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let message: Value = serde_json::from_slice(&rest[4..4 + length]).unwrap();
        messages.push(message);
        rest = &rest[4 + length..];
    }

    let types: Vec<_> = messages.iter().map(|m| m["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["skeleton", "chartUpdate", "chartUpdate", "complete"]);
    assert_eq!(messages[0]["charts"].as_array().unwrap().len(), 2);
    assert_eq!(messages[3]["failedCharts"], 0);
}
