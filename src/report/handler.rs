//! The route handler for downloading the report.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    budget::get_budgets_by_owner,
    dashboard::summarize,
    report::{
        layout::build_report,
        pdf::{PdfRenderer, ReportRenderer},
    },
    timezone::get_local_today,
    transaction::get_transactions_by_owner,
};

#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Responds with a PDF of the logged in user's totals, transactions and budgets.
pub async fn get_report(
    State(state): State<ReportState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let (transactions, budgets) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_transactions_by_owner(user.id, &connection)?,
            get_budgets_by_owner(user.id, &connection)?,
        )
    };

    let summary = summarize(&transactions, &budgets);
    let report = build_report(&summary, &transactions, &budgets, today);
    let pdf = PdfRenderer.render(&report)?;

    tracing::info!(
        "Created report for user {} with {} transactions and {} budgets",
        user.id,
        transactions.len(),
        budgets.len()
    );

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"finance_report_{today}.pdf\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
