use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
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
        core::create_budget,
        form::{BudgetForm, FormAction, ValidatedBudget, invalid_form_response},
    },
    endpoints,
    timezone::get_local_today,
};

#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a budget owned by the logged in user,
/// redirects to the budgets view on success.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(user): Extension<User>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let today = match get_local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let budget = match ValidatedBudget::new(&form, today) {
        Ok(budget) => budget,
        Err(Error::Validation(errors)) => {
            return invalid_form_response(FormAction::Create, &form, &errors);
        }
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_budget(user.id, &budget, &connection) {
        tracing::error!("could not create budget: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
