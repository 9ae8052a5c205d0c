//! HTTP-level tests for the climate gateway against a mock POWER server.

use chrono::NaiveDate;
use farm_core::ReadingVariant;
use farm_gateway::{GatewayError, PowerClient, ReadingQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POINT_PATH: &str = "/api/temporal/daily/point";

fn mwea_query(variant: ReadingVariant) -> ReadingQuery {
    ReadingQuery {
        latitude: -0.6167,
        longitude: 37.3833,
        start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        variant,
    }
}

fn client_for(server: &MockServer) -> PowerClient {
    PowerClient::new(format!("{}{POINT_PATH}", server.uri()), None).unwrap()
}

#[tokio::test]
async fn fetches_first_date_from_power_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .and(query_param("parameters", "NDVI,PRECTOT"))
        .and(query_param("community", "AG"))
        .and(query_param("latitude", "-0.6167"))
        .and(query_param("longitude", "37.3833"))
        .and(query_param("start", "20240101"))
        .and(query_param("end", "20240110"))
        .and(query_param("format", "JSON"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"type":"Feature","properties":{"parameter":{
                "NDVI":{"20240101":0.58,"20240102":0.6},
                "PRECTOT":{"20240101":2.4,"20240102":0.0}
            }}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server)
        .fetch_reading(&mwea_query(ReadingVariant::WithVegetation))
        .await
        .unwrap();

    assert!((reading.precipitation - 2.4).abs() < 1e-9);
    assert!((reading.vegetation_index.unwrap() - 0.58).abs() < 1e-9);
}

#[tokio::test]
async fn precipitation_only_variant_leaves_vegetation_unset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .and(query_param("parameters", "PRECTOT"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"properties":{"parameter":{"PRECTOT":{"20240101":5.5}}}}"#,
        ))
        .mount(&server)
        .await;

    let reading = client_for(&server)
        .fetch_reading(&mwea_query(ReadingVariant::PrecipitationOnly))
        .await
        .unwrap();

    assert!((reading.precipitation - 5.5).abs() < 1e-9);
    assert_eq!(reading.vegetation_index, None);
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_string(r#"{"messages":["bad"]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_reading(&mwea_query(ReadingVariant::WithVegetation))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Api { status: 422 }), "{err:?}");
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_reading(&mwea_query(ReadingVariant::WithVegetation))
        .await;

    assert!(matches!(result, Err(GatewayError::Api { status: 503 })));
}

#[tokio::test]
async fn missing_parameter_is_data_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POINT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"properties":{"parameter":{}}}"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_reading(&mwea_query(ReadingVariant::WithVegetation))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "data_missing");
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let endpoint = format!("http://127.0.0.1:{port}{POINT_PATH}");

    let client = PowerClient::new(endpoint, Some(std::time::Duration::from_secs(2))).unwrap();
    let err = client
        .fetch_reading(&mwea_query(ReadingVariant::PrecipitationOnly))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Network(_)), "{err:?}");
}
