//! Request parameters for metric calls: dates, grouping, and the query
//! builder.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::error::ApiError;

/// Wire format for every date parameter.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A report date, transmitted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    /// Today in the local timezone.
    pub fn today() -> Self {
        ReportDate(Local::now().date_naive())
    }
}

impl From<NaiveDate> for ReportDate {
    fn from(date: NaiveDate) -> Self {
        ReportDate(date)
    }
}

impl FromStr for ReportDate {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(ReportDate)
            .map_err(|source| ApiError::InvalidDate {
                input: s.to_string(),
                source,
            })
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Reporting period: a start date and an optional end date.
///
/// With no end date the period is the single start day; the serialized
/// request repeats the start as `endDate`, which is what the service expects.
/// Ranges whose end precedes the start are rejected by the service itself;
/// the client does not duplicate that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: ReportDate,
    pub end: Option<ReportDate>,
}

impl DateRange {
    /// A single-day period.
    pub fn day(date: impl Into<ReportDate>) -> Self {
        DateRange {
            start: date.into(),
            end: None,
        }
    }

    /// An inclusive start..end period.
    pub fn span(start: impl Into<ReportDate>, end: impl Into<ReportDate>) -> Self {
        DateRange {
            start: start.into(),
            end: Some(end.into()),
        }
    }
}

impl From<ReportDate> for DateRange {
    fn from(date: ReportDate) -> Self {
        DateRange::day(date)
    }
}

impl From<NaiveDate> for DateRange {
    fn from(date: NaiveDate) -> Self {
        DateRange::day(date)
    }
}

impl From<(ReportDate, ReportDate)> for DateRange {
    fn from((start, end): (ReportDate, ReportDate)) -> Self {
        DateRange::span(start, end)
    }
}

impl From<(NaiveDate, NaiveDate)> for DateRange {
    fn from((start, end): (NaiveDate, NaiveDate)) -> Self {
        DateRange::span(start, end)
    }
}

/// Time bucket used to aggregate a metric's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Days,
    Weeks,
    Months,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Days => "DAYS",
            GroupBy::Weeks => "WEEKS",
            GroupBy::Months => "MONTHS",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of a metric request.
///
/// Only fields that were set are serialized; unset options are omitted
/// outright rather than sent as null or empty markers.
#[derive(Debug, Default, Clone)]
pub struct MetricQuery {
    start_date: Option<ReportDate>,
    end_date: Option<ReportDate>,
    event_name: Option<String>,
    country: Option<String>,
    version_name: Option<String>,
    group_by: Option<GroupBy>,
}

impl MetricQuery {
    /// Create an empty query. Valid as-is for the appInfo endpoints, which
    /// take no parameters beyond the credentials.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: impl Into<ReportDate>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<ReportDate>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Set both date bounds from a period.
    pub fn period(mut self, period: impl Into<DateRange>) -> Self {
        let period = period.into();
        self.start_date = Some(period.start);
        self.end_date = period.end;
        self
    }

    pub fn event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }

    /// Country filter. The service treats `"ALL"` as "break the result down
    /// by country".
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Filter on the version name the developer assigned in the portal.
    pub fn version_name(mut self, version: impl Into<String>) -> Self {
        self.version_name = Some(version.into());
        self
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Present parameters in wire order, values not yet URL-encoded.
    ///
    /// An absent end date is defaulted to the start date here, so a one-day
    /// request always carries both bounds.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.to_string()));
            pairs.push(("endDate", self.end_date.unwrap_or(start).to_string()));
        } else if let Some(end) = self.end_date {
            pairs.push(("endDate", end.to_string()));
        }
        if let Some(ref event_name) = self.event_name {
            pairs.push(("eventName", event_name.clone()));
        }
        if let Some(ref country) = self.country {
            pairs.push(("country", country.clone()));
        }
        if let Some(ref version_name) = self.version_name {
            pairs.push(("versionName", version_name.clone()));
        }
        if let Some(group_by) = self.group_by {
            pairs.push(("groupBy", group_by.as_str().to_string()));
        }

        pairs
    }
}
