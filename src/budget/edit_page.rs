use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    budget::{
        core::get_budget_for_mutation,
        form::{BudgetForm, FormAction, budget_form_page},
    },
    database_id::BudgetId,
};

#[derive(Debug, Clone)]
pub struct EditBudgetPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the form for editing a budget owned by the logged in user.
pub async fn get_edit_budget_page(
    State(state): State<EditBudgetPageState>,
    Extension(user): Extension<User>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let budget = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_budget_for_mutation(budget_id, &user, &connection)?
    };

    let form = BudgetForm::from(&budget);

    Ok(budget_form_page("Edit Budget", FormAction::Edit(budget_id), &form).into_response())
}
