//! Analytic pipeline behind the sales dashboard.
//!
//! Every user interaction re-runs the same pure pipeline against the immutable
//! [`sales_model::Dataset`]:
//!
//! 1. [`resolve`] narrows the rows by region, subregion and date window, recomputing the
//!    valid options of each control from the controls before it.
//! 2. [`top_n`] ranks products by revenue and by margin.
//! 3. [`aggregate_by_subregion`] totals revenue per subregion and joins coordinates.
//! 4. [`wrap_label`] reflows ranking labels for chart axes.
//!
//! [`render`] composes the stages into a [`DashboardView`]; [`DashboardSession`] owns the
//! snapshots for the lifetime of a session.

#![forbid(unsafe_code)]

mod config;
mod dashboard;
mod filter;
mod geo_agg;
mod label;
mod ranking;
mod session;
mod warning;

pub use crate::config::{ConfigError, DashboardConfig};
pub use crate::dashboard::{render, ChartBar, DashboardView, RenderRequest};
pub use crate::filter::{resolve, Choice, DateWindow, FilterResolution, FilterSelection};
pub use crate::geo_agg::{aggregate_by_subregion, GeoAggregation, GeoEntry, MapPoint};
pub use crate::label::{wrap_label, DEFAULT_LINE_BREAK};
pub use crate::ranking::{top_n, GroupKey, Metric, RankedEntry, RankingResult};
pub use crate::session::{DashboardSession, RefreshTicket, SessionError};
pub use crate::warning::Warning;
