//! Client for the Flurry analytics reporting API.
//!
//! Flurry exposes per-application usage reports over a read-only HTTP+JSON
//! API: application metrics such as active users, sessions and page views,
//! account and application info, and custom event metrics with per-parameter
//! counters. This crate wraps that API behind [`FlurryClient`] and adds
//! typed navigation helpers for the service's XML-flavored JSON responses.
//!
//! Requests are paced to the service's rate limit, one per second unless
//! configured otherwise, and the account credentials ride along on every
//! call.
//!
//! ```no_run
//! use flurry_client::{AppFilter, DateRange, FlurryClient, GroupBy, ReportDate};
//!
//! # async fn run() -> Result<(), flurry_client::ApiError> {
//! let client = FlurryClient::new("ACCESS_CODE", "API_KEY")?;
//!
//! let start: ReportDate = "2013-01-01".parse()?;
//! let end: ReportDate = "2013-01-31".parse()?;
//! let sessions = client
//!     .sessions(
//!         DateRange::span(start, end),
//!         &AppFilter::default(),
//!         Some(GroupBy::Weeks),
//!     )
//!     .await?;
//! println!("{sessions:#}");
//!
//! let events = client.list_events(None).await?;
//! let revenue = client.parameter_totals(&events, "Revenue", start).await?;
//! for (event, total) in &revenue {
//!     println!("{event}: {total:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod pacer;
pub mod query;
pub mod response;

pub use catalog::{Group, Metric};
pub use client::{AppFilter, FlurryClient};
pub use config::Config;
pub use error::{ApiError, ConfigError, NavigationError};
pub use pacer::RequestPacer;
pub use query::{DateRange, GroupBy, MetricQuery, ReportDate};
pub use response::{EventRecord, ParameterRecord};
