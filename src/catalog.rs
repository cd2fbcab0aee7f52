//! The fixed catalog of Flurry report endpoints.
//!
//! Every endpoint is `GET /{group}/{metric}`; the pairing is closed, so it is
//! encoded in the type: each [`Metric`] variant knows its [`Group`] and an
//! invalid combination cannot be constructed.

use std::fmt;

/// Top-level endpoint category of the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    AppMetrics,
    AppInfo,
    EventMetrics,
}

impl Group {
    /// Path segment as the service spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Group::AppMetrics => "appMetrics",
            Group::AppInfo => "appInfo",
            Group::EventMetrics => "eventMetrics",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Unique users who accessed the application, bucketed by day.
    ActiveUsers,
    /// Unique users per complete calendar week; the service fixes the
    /// bucketing, so the grouping parameter does not apply.
    ActiveUsersByWeek,
    /// Unique users per complete calendar month; bucketing fixed, as above.
    ActiveUsersByMonth,
    /// Users who ran the application for the first time.
    NewUsers,
    /// Median session length.
    MedianSessionLength,
    /// Average session length.
    AvgSessionLength,
    /// Number of times the application was accessed.
    Sessions,
    /// Users who remain active users of the application.
    RetainedUsers,
    /// Total page views.
    PageViews,
    /// Average page views per session.
    AvgPageViewsPerSession,
    /// Information on the application the API key belongs to.
    Application,
    /// Information on every application under the account.
    AllApplications,
    /// Per-event usage totals for all events of the application.
    Summary,
    /// Detailed metrics for one named event, including its parameters.
    Event,
}

impl Metric {
    /// Every metric, in catalog order. Handy for exhaustive checks.
    pub const ALL: [Metric; 14] = [
        Metric::ActiveUsers,
        Metric::ActiveUsersByWeek,
        Metric::ActiveUsersByMonth,
        Metric::NewUsers,
        Metric::MedianSessionLength,
        Metric::AvgSessionLength,
        Metric::Sessions,
        Metric::RetainedUsers,
        Metric::PageViews,
        Metric::AvgPageViewsPerSession,
        Metric::Application,
        Metric::AllApplications,
        Metric::Summary,
        Metric::Event,
    ];

    /// The endpoint group this metric is registered under.
    pub fn group(self) -> Group {
        match self {
            Metric::ActiveUsers
            | Metric::ActiveUsersByWeek
            | Metric::ActiveUsersByMonth
            | Metric::NewUsers
            | Metric::MedianSessionLength
            | Metric::AvgSessionLength
            | Metric::Sessions
            | Metric::RetainedUsers
            | Metric::PageViews
            | Metric::AvgPageViewsPerSession => Group::AppMetrics,
            Metric::Application | Metric::AllApplications => Group::AppInfo,
            Metric::Summary | Metric::Event => Group::EventMetrics,
        }
    }

    /// Path segment as the service spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::ActiveUsers => "ActiveUsers",
            Metric::ActiveUsersByWeek => "ActiveUsersByWeek",
            Metric::ActiveUsersByMonth => "ActiveUsersByMonth",
            Metric::NewUsers => "NewUsers",
            Metric::MedianSessionLength => "MedianSessionLength",
            Metric::AvgSessionLength => "AvgSessionLength",
            Metric::Sessions => "Sessions",
            Metric::RetainedUsers => "RetainedUsers",
            Metric::PageViews => "PageViews",
            Metric::AvgPageViewsPerSession => "AvgPageViewsPerSession",
            Metric::Application => "getApplication",
            Metric::AllApplications => "getAllApplications",
            Metric::Summary => "Summary",
            Metric::Event => "Event",
        }
    }

    /// URL path below the API root, e.g. `appMetrics/NewUsers`.
    pub fn path(self) -> String {
        format!("{}/{}", self.group().as_str(), self.as_str())
    }

    /// Whether the service honors a `groupBy` parameter for this metric.
    ///
    /// The by-week/by-month active user reports come pre-bucketed, and the
    /// appInfo and eventMetrics endpoints are not time series at all.
    pub fn accepts_group_by(self) -> bool {
        matches!(
            self,
            Metric::NewUsers
                | Metric::MedianSessionLength
                | Metric::AvgSessionLength
                | Metric::Sessions
                | Metric::RetainedUsers
                | Metric::PageViews
                | Metric::AvgPageViewsPerSession
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
