//! Dashboard module
//!
//! Provides an overview page with the user's totals, a chart of the last six
//! months and breakdowns by category.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{Summary, most_recent, summarize};
pub use handlers::get_dashboard_page;
