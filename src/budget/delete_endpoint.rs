use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    budget::core::{delete_budget, get_budget_for_mutation},
    database_id::BudgetId,
    endpoints,
};

#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a budget, redirects to the budgets view on success.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Extension(user): Extension<User>,
    Path(budget_id): Path<BudgetId>,
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

    match delete_budget(budget_id, &connection) {
        Ok(0) => Error::NotFound.into_alert_response(),
        Ok(_) => (
            HxRedirect(endpoints::BUDGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not delete budget {budget_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        budget::{Budget, ValidatedBudget, create_budget, get_budget},
        test_utils::{TestUsers, must_create_test_db},
    };

    use super::{DeleteBudgetState, delete_budget_endpoint};

    fn setup() -> (DeleteBudgetState, TestUsers, Budget) {
        let (db_connection, users) = must_create_test_db();
        let budget = create_budget(
            users.alice.id,
            &ValidatedBudget {
                category: "Fun".to_owned(),
                amount: "50".parse().unwrap(),
                start_date: date!(2025 - 06 - 01),
                end_date: Some(date!(2025 - 06 - 30)),
                notes: None,
            },
            &db_connection.lock().unwrap(),
        )
        .unwrap();

        (DeleteBudgetState { db_connection }, users, budget)
    }

    #[tokio::test]
    async fn owner_can_delete_budget() {
        let (state, users, budget) = setup();

        let response =
            delete_budget_endpoint(State(state.clone()), Extension(users.alice), Path(budget.id))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_budget(budget.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn superuser_can_delete_any_budget() {
        let (state, users, budget) = setup();

        let response =
            delete_budget_endpoint(State(state.clone()), Extension(users.admin), Path(budget.id))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn other_user_is_forbidden_and_budget_kept() {
        let (state, users, budget) = setup();

        let response =
            delete_budget_endpoint(State(state.clone()), Extension(users.bob), Path(budget.id))
                .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            get_budget(budget.id, &state.db_connection.lock().unwrap()),
            Ok(budget)
        );
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let (state, users, _) = setup();

        let response = delete_budget_endpoint(State(state), Extension(users.alice), Path(31)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
