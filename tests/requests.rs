//! Request behavior against a mock service: URL shape, headers, and the
//! mapping from response bodies to errors.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flurry_client::{
    ApiError, AppFilter, Config, DateRange, FlurryClient, GroupBy, Metric, MetricQuery, ReportDate,
};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new("ACCESS", "KEY");
    config.base_url = server.uri();
    config.request_interval_ms = 0;
    config.debug = true;
    config
}

fn client_for(server: &MockServer) -> FlurryClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    FlurryClient::from_config(&config_for(server)).unwrap()
}

fn date(s: &str) -> ReportDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn requests_carry_credentials_and_present_parameters_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appMetrics/NewUsers"))
        .and(query_param("apiAccessCode", "ACCESS"))
        .and(query_param("apiKey", "KEY"))
        .and(query_param("startDate", "2013-01-01"))
        .and(query_param("endDate", "2013-01-07"))
        .and(query_param("country", "US"))
        .and(query_param("groupBy", "WEEKS"))
        .and(query_param_is_missing("eventName"))
        .and(query_param_is_missing("versionName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@metric": "NewUsers"})))
        .expect(1)
        .mount(&server)
        .await;

    let filter = AppFilter {
        country: Some("US".to_string()),
        ..Default::default()
    };
    let value = client_for(&server)
        .new_users(
            DateRange::span(date("2013-01-01"), date("2013-01-07")),
            &filter,
            Some(GroupBy::Weeks),
        )
        .await
        .unwrap();

    assert_eq!(value["@metric"], "NewUsers");
}

#[tokio::test]
async fn requests_ask_for_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appInfo/getApplication"))
        .and(header("Accept", "application/json"))
        .and(query_param_is_missing("startDate"))
        .and(query_param_is_missing("endDate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@name": "My App"})))
        .expect(1)
        .mount(&server)
        .await;

    let value = client_for(&server).application().await.unwrap();
    assert_eq!(value["@name"], "My App");
}

#[tokio::test]
async fn active_users_by_week_never_sends_group_by() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appMetrics/ActiveUsersByWeek"))
        .and(query_param_is_missing("groupBy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@metric": "ActiveUsersByWeek"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .active_users_by_week(date("2013-01-01"), &AppFilter::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn error_payloads_fail_even_on_http_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 108, "message": "Invalid Api Key"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .active_users(date("2013-01-01"), &AppFilter::default())
        .await
        .unwrap_err();

    match err {
        ApiError::Service { code, message } => {
            assert_eq!(code, "108");
            assert_eq!(message, "Invalid Api Key");
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_payloads_are_read_from_failure_statuses_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": "99", "message": "Date range invalid"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sessions(date("2013-01-01"), &AppFilter::default(), None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::Service { ref code, .. } if code == "99"),
        "expected a service error, got {err:?}"
    );
}

#[tokio::test]
async fn plain_failure_statuses_surface_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .all_applications()
        .await
        .unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected an http error, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_json_without_a_code_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such app"})))
        .mount(&server)
        .await;

    let err = client_for(&server).application().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status, .. } if status.as_u16() == 404));
}

#[tokio::test]
async fn unparseable_success_bodies_are_json_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).application().await.unwrap_err();
    assert!(matches!(err, ApiError::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn transport_failures_propagate_as_request_errors() {
    // Nothing listens on port 1.
    let mut config = Config::new("ACCESS", "KEY");
    config.base_url = "http://127.0.0.1:1".to_string();
    config.request_interval_ms = 0;

    let err = FlurryClient::from_config(&config)
        .unwrap()
        .request(Metric::Summary, &MetricQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Request(_)), "got {err:?}");
}

#[tokio::test]
async fn rotated_keys_are_sent_on_subsequent_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appInfo/getApplication"))
        .and(query_param("apiKey", "SECOND"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@name": "Other App"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.rotate_key("SECOND");
    client.application().await.unwrap();
}
