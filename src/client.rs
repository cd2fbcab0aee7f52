//! Flurry reporting API client.

use std::collections::BTreeMap;

use reqwest::Client;
use serde_json::Value;

use crate::catalog::Metric;
use crate::config::Config;
use crate::error::ApiError;
use crate::pacer::RequestPacer;
use crate::query::{DateRange, GroupBy, MetricQuery, ReportDate};
use crate::response;

/// Optional filters shared by the appMetrics calls.
#[derive(Debug, Clone, Default)]
pub struct AppFilter {
    /// Country filter; `"ALL"` breaks the result down by country.
    pub country: Option<String>,
    /// Version name the developer assigned in the Flurry portal.
    pub version_name: Option<String>,
}

impl AppFilter {
    fn apply(&self, mut query: MetricQuery) -> MetricQuery {
        if let Some(ref country) = self.country {
            query = query.country(country.clone());
        }
        if let Some(ref version) = self.version_name {
            query = query.version_name(version.clone());
        }
        query
    }
}

/// Client for the Flurry analytics reporting API.
///
/// Every call is a GET request authenticated by the account access code and
/// the application API key, both attached to the query string. Requests are
/// spaced out through a shared [`RequestPacer`]; clones of a client share
/// the same cadence.
#[derive(Clone)]
pub struct FlurryClient {
    base_url: String,
    api_access_code: String,
    api_key: String,
    http_client: Client,
    pacer: RequestPacer,
    debug: bool,
}

impl FlurryClient {
    /// Create a client with default settings: the public endpoint, a 30
    /// second timeout, one request per second.
    ///
    /// Credentials are stored as given; the service validates them on the
    /// first call.
    ///
    /// # Errors
    /// Returns `ApiError::HttpClientInit` if the HTTP client cannot be created.
    pub fn new(
        api_access_code: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::from_config(&Config::new(api_access_code, api_key))
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    /// Returns `ApiError::HttpClientInit` if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            api_access_code: config.api_access_code.clone(),
            api_key: config.api_key.clone(),
            http_client,
            pacer: RequestPacer::new(config.request_interval()),
            debug: config.debug,
        })
    }

    /// Swap the application API key, e.g. to query another application of
    /// the same account. The access code and pacing are unaffected.
    pub fn rotate_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    /// Issue one GET request for a metric and return the decoded JSON body.
    ///
    /// Waits on the shared pacer first. The body is read whatever the HTTP
    /// status: a payload with a top-level `code` field is a service-reported
    /// error and maps to [`ApiError::Service`], a non-success status without
    /// one maps to [`ApiError::Http`].
    pub async fn request(&self, metric: Metric, query: &MetricQuery) -> Result<Value, ApiError> {
        self.pacer.pause().await;

        let url = self.build_url(metric, query);
        if self.debug {
            tracing::debug!(path = %metric.path(), "sending metric request");
        }

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                if let Some(error) = service_error(&value) {
                    Err(error)
                } else if status.is_success() {
                    Ok(value)
                } else {
                    Err(ApiError::Http { status, body })
                }
            }
            Err(source) if status.is_success() => Err(ApiError::Json(source)),
            Err(_) => Err(ApiError::Http { status, body }),
        }
    }

    /// The full request URL for a metric call. Credentials lead, then the
    /// query parameters in the order the service documents.
    fn build_url(&self, metric: Metric, query: &MetricQuery) -> String {
        let mut url = format!(
            "{}/{}?apiAccessCode={}&apiKey={}",
            self.base_url,
            metric.path(),
            urlencoding::encode(&self.api_access_code),
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in query.query_pairs() {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(&value)));
        }
        url
    }

    async fn app_metric(
        &self,
        metric: Metric,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        let mut query = filter.apply(MetricQuery::new().period(period));
        if let Some(group_by) = group_by {
            query = query.group_by(group_by);
        }
        self.request(metric, &query).await
    }

    /// Total number of unique users who accessed the application per day.
    pub async fn active_users(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::ActiveUsers, period, filter, None)
            .await
    }

    /// Unique users per week. Only complete calendar weeks inside the
    /// period produce data; the grouping is fixed, so no `groupBy` applies.
    pub async fn active_users_by_week(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::ActiveUsersByWeek, period, filter, None)
            .await
    }

    /// Unique users per month. Only complete calendar months inside the
    /// period produce data; the grouping is fixed, so no `groupBy` applies.
    pub async fn active_users_by_month(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::ActiveUsersByMonth, period, filter, None)
            .await
    }

    /// Total number of users who used the application for the first time.
    pub async fn new_users(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::NewUsers, period, filter, group_by)
            .await
    }

    /// Median length of a user session.
    pub async fn median_session_length(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::MedianSessionLength, period, filter, group_by)
            .await
    }

    /// Average length of a user session.
    pub async fn avg_session_length(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::AvgSessionLength, period, filter, group_by)
            .await
    }

    /// Total number of times users accessed the application.
    pub async fn sessions(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::Sessions, period, filter, group_by)
            .await
    }

    /// Total number of users who remain active users of the application.
    pub async fn retained_users(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::RetainedUsers, period, filter, group_by)
            .await
    }

    /// Total number of page views.
    pub async fn page_views(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::PageViews, period, filter, group_by)
            .await
    }

    /// Average page views per session.
    pub async fn avg_page_views_per_session(
        &self,
        period: impl Into<DateRange>,
        filter: &AppFilter,
        group_by: Option<GroupBy>,
    ) -> Result<Value, ApiError> {
        self.app_metric(Metric::AvgPageViewsPerSession, period, filter, group_by)
            .await
    }

    /// Information on the application the API key belongs to.
    pub async fn application(&self) -> Result<Value, ApiError> {
        self.request(Metric::Application, &MetricQuery::new()).await
    }

    /// Information on every application under the account.
    pub async fn all_applications(&self) -> Result<Value, ApiError> {
        self.request(Metric::AllApplications, &MetricQuery::new())
            .await
    }

    /// Per-event usage summary over the period: unique users, total counts
    /// and sessions for each event the application recorded.
    pub async fn event_summary(
        &self,
        period: impl Into<DateRange>,
        version_name: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut query = MetricQuery::new().period(period);
        if let Some(version) = version_name {
            query = query.version_name(version);
        }
        self.request(Metric::Summary, &query).await
    }

    /// Detailed metrics for one event, its parameter table included.
    pub async fn event_metrics(
        &self,
        event_name: &str,
        period: impl Into<DateRange>,
        version_name: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut query = MetricQuery::new().period(period).event_name(event_name);
        if let Some(version) = version_name {
            query = query.version_name(version);
        }
        self.request(Metric::Event, &query).await
    }

    /// Names of every event the application recorded on the given day,
    /// today (local time) when `on` is `None`. Names keep their ordinal
    /// prefix so they can be passed straight back to [`event_metrics`].
    ///
    /// [`event_metrics`]: FlurryClient::event_metrics
    pub async fn list_events(&self, on: Option<ReportDate>) -> Result<Vec<String>, ApiError> {
        let date = on.unwrap_or_else(ReportDate::today);
        let summary = self.event_summary(date, None).await?;
        Ok(response::event_names(&summary)?)
    }

    /// Total occurrence count of one parameter across several events.
    ///
    /// Issues one Event request per event, in order and paced. Every
    /// requested event keeps its key in the result; `None` means the event
    /// does not carry the parameter, or the parameter has no count.
    pub async fn parameter_totals(
        &self,
        events: &[impl AsRef<str>],
        parameter: &str,
        period: impl Into<DateRange>,
    ) -> Result<BTreeMap<String, Option<i64>>, ApiError> {
        let period = period.into();
        let mut totals = BTreeMap::new();
        for event in events {
            let event = event.as_ref();
            let metrics = self.event_metrics(event, period, None).await?;
            let total = response::find_parameter(&metrics, parameter)?
                .and_then(|record| record.total_count);
            totals.insert(event.to_string(), total);
        }
        Ok(totals)
    }

    /// Per-event totals for several parameters at once. Still one Event
    /// request per event; each response is probed for every parameter.
    /// Outer key is the parameter name, inner key the event name.
    pub async fn parameter_matrix(
        &self,
        events: &[impl AsRef<str>],
        parameters: &[impl AsRef<str>],
        period: impl Into<DateRange>,
    ) -> Result<BTreeMap<String, BTreeMap<String, Option<i64>>>, ApiError> {
        let period = period.into();
        let mut matrix: BTreeMap<String, BTreeMap<String, Option<i64>>> = BTreeMap::new();
        for event in events {
            let event = event.as_ref();
            let metrics = self.event_metrics(event, period, None).await?;
            for parameter in parameters {
                let parameter = parameter.as_ref();
                let total = response::find_parameter(&metrics, parameter)?
                    .and_then(|record| record.total_count);
                matrix
                    .entry(parameter.to_string())
                    .or_default()
                    .insert(event.to_string(), total);
            }
        }
        Ok(matrix)
    }
}

/// A service-reported error payload: a top-level `code` (JSON number or
/// string, preserved as sent) next to a `message`.
fn service_error(value: &Value) -> Option<ApiError> {
    let code = match value.get("code")? {
        Value::String(code) => code.clone(),
        other => other.to_string(),
    };
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(ApiError::Service { code, message })
}

impl std::fmt::Debug for FlurryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlurryClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> FlurryClient {
        FlurryClient::new("ACCESS", "KEY").unwrap()
    }

    fn date(s: &str) -> ReportDate {
        s.parse().unwrap()
    }

    #[test]
    fn url_serializes_present_parameters_in_wire_order() {
        let query = MetricQuery::new()
            .period(DateRange::span(date("2013-01-01"), date("2013-01-07")))
            .country("US")
            .group_by(GroupBy::Weeks);
        let url = client().build_url(Metric::NewUsers, &query);

        assert_eq!(
            url,
            "http://api.flurry.com/appMetrics/NewUsers\
             ?apiAccessCode=ACCESS&apiKey=KEY\
             &startDate=2013-01-01&endDate=2013-01-07&country=US&groupBy=WEEKS"
        );
        assert!(!url.contains("eventName"));
        assert!(!url.contains("versionName"));
    }

    #[test]
    fn single_day_urls_repeat_the_start_date() {
        let query = MetricQuery::new().period(date("2013-04-19"));
        let url = client().build_url(Metric::ActiveUsers, &query);
        assert!(url.ends_with("startDate=2013-04-19&endDate=2013-04-19"));
    }

    #[test]
    fn app_info_urls_carry_only_credentials() {
        let url = client().build_url(Metric::AllApplications, &MetricQuery::new());
        assert_eq!(
            url,
            "http://api.flurry.com/appInfo/getAllApplications?apiAccessCode=ACCESS&apiKey=KEY"
        );
    }

    #[test]
    fn url_encodes_query_values() {
        let query = MetricQuery::new()
            .period(date("2013-04-19"))
            .event_name("Sign Up & Pay");
        let url = client().build_url(Metric::Event, &query);
        assert!(url.contains("eventName=Sign%20Up%20%26%20Pay"));
    }

    #[test]
    fn rotate_key_swaps_only_the_application_key() {
        let mut client = client();
        client.rotate_key("OTHER");
        let url = client.build_url(Metric::Application, &MetricQuery::new());
        assert!(url.contains("apiAccessCode=ACCESS&apiKey=OTHER"));
    }

    #[test]
    fn app_filter_applies_only_set_fields() {
        let filter = AppFilter {
            country: Some("ALL".to_string()),
            ..Default::default()
        };
        let pairs = filter.apply(MetricQuery::new()).query_pairs();
        assert_eq!(pairs, vec![("country", "ALL".to_string())]);
    }

    #[test]
    fn service_error_preserves_numeric_codes() {
        let error = service_error(&json!({"code": 108, "message": "invalid api key"}));
        match error {
            Some(ApiError::Service { code, message }) => {
                assert_eq!(code, "108");
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn service_error_preserves_string_codes() {
        let error = service_error(&json!({"code": "99", "message": "bad date range"}));
        match error {
            Some(ApiError::Service { code, .. }) => assert_eq!(code, "99"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn metric_payloads_are_not_mistaken_for_errors() {
        let payload = json!({"@metric": "ActiveUsers", "day": [{"@value": 10}]});
        assert!(service_error(&payload).is_none());
    }

    #[test]
    fn debug_output_hides_credentials() {
        let output = format!("{:?}", client());
        assert!(output.contains("api.flurry.com"));
        assert!(!output.contains("ACCESS"));
        assert!(!output.contains("KEY"));
    }
}
