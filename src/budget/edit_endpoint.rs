use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    budget::{
        core::{get_budget_for_mutation, update_budget},
        form::{BudgetForm, FormAction, ValidatedBudget, invalid_form_response},
    },
    database_id::BudgetId,
    endpoints,
    timezone::get_local_today,
};

#[derive(Debug, Clone)]
pub struct EditBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for updating a budget, redirects to the budgets view on success.
///
/// Responds with 404 if the budget does not exist, 403 if the logged in
/// user may not change it and 422 with the form if the input is invalid.
pub async fn edit_budget_endpoint(
    State(state): State<EditBudgetState>,
    Extension(user): Extension<User>,
    Path(budget_id): Path<BudgetId>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = get_budget_for_mutation(budget_id, &user, &connection) {
        return error.into_alert_response();
    }

    let today = match get_local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let budget = match ValidatedBudget::new(&form, today) {
        Ok(budget) => budget,
        Err(Error::Validation(errors)) => {
            return invalid_form_response(FormAction::Edit(budget_id), &form, &errors);
        }
        Err(error) => return error.into_alert_response(),
    };

    match update_budget(budget_id, &budget, &connection) {
        Ok(0) => Error::NotFound.into_alert_response(),
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update budget {budget_id}: {error}");
            error.into_alert_response()
        }
    }
}
