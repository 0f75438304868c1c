//! Report module
//!
//! Builds a downloadable PDF summarising the logged in user's transactions
//! and budgets.

mod handler;
mod layout;
mod pdf;

pub use handler::get_report;
