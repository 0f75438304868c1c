//! The endpoint for saving changes to a transaction.

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
    database_id::TransactionId,
    endpoints,
    timezone::get_local_today,
    transaction::{
        core::{get_transaction_for_mutation, update_transaction},
        form::{FormAction, TransactionForm, ValidatedTransaction, invalid_form_response},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for updating a transaction, redirects to the transactions view on success.
///
/// Responds with 404 if the transaction does not exist, 403 if the logged in
/// user may not change it and 422 with the form if the input is invalid.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user): Extension<User>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = get_transaction_for_mutation(transaction_id, &user, &connection) {
        return error.into_alert_response();
    }

    let today = match get_local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = match ValidatedTransaction::new(&form, today) {
        Ok(transaction) => transaction,
        Err(Error::Validation(errors)) => {
            return invalid_form_response(FormAction::Edit(transaction_id), &form, &errors);
        }
        Err(error) => return error.into_alert_response(),
    };

    match update_transaction(transaction_id, &transaction, &connection) {
        Ok(0) => {
            tracing::error!(
                "Could not update transaction {transaction_id}: update returned zero rows affected"
            );
            return Error::NotFound.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{
            TestUsers, assert_form_error_message, assert_hx_redirect, must_create_test_db,
            must_get_form, parse_html_fragment,
        },
        transaction::{
            PaymentMethod, Transaction, TransactionKind, ValidatedTransaction,
            create_transaction, form::TransactionForm, get_transaction,
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn setup() -> (EditTransactionState, TestUsers, Transaction) {
        let (db_connection, users) = must_create_test_db();
        let transaction = create_transaction(
            users.alice.id,
            &ValidatedTransaction {
                title: "Groceries".to_owned(),
                amount: "80".parse().unwrap(),
                kind: TransactionKind::Expense,
                category: "Food".to_owned(),
                date: date!(2025 - 05 - 04),
                notes: None,
                recurring: false,
                payment_method: PaymentMethod::Card,
            },
            &db_connection.lock().unwrap(),
        )
        .unwrap();
        let state = EditTransactionState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, users, transaction)
    }

    fn edited_form(amount: &str) -> TransactionForm {
        TransactionForm {
            title: "Dinner".to_owned(),
            amount: amount.to_owned(),
            transaction_type: "Expense".to_owned(),
            category: "Eating out".to_owned(),
            date: "2025-05-05".to_owned(),
            notes: "Birthday".to_owned(),
            recurring: None,
            payment_method: "cash".to_owned(),
        }
    }

    fn must_get(db_connection: &Arc<Mutex<Connection>>, transaction: &Transaction) -> Transaction {
        get_transaction(transaction.id, &db_connection.lock().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn owner_can_update_transaction() {
        let (state, users, transaction) = setup();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(users.alice.clone()),
            Path(transaction.id),
            Form(edited_form("95.50")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let got = must_get(&state.db_connection, &transaction);
        assert_eq!(got.title, "Dinner");
        assert_eq!(got.amount.to_string(), "95.50");
        assert_eq!(got.notes.as_deref(), Some("Birthday"));
        assert_eq!(got.payment_method, PaymentMethod::Cash);
        assert_eq!(got.owner, users.alice.id);
    }

    #[tokio::test]
    async fn superuser_can_update_any_transaction() {
        let (state, users, transaction) = setup();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(users.admin),
            Path(transaction.id),
            Form(edited_form("10")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let got = must_get(&state.db_connection, &transaction);
        assert_eq!(got.title, "Dinner");
        assert_eq!(got.owner, users.alice.id, "owner should never change");
    }

    #[tokio::test]
    async fn other_user_is_forbidden_and_transaction_unchanged() {
        let (state, users, transaction) = setup();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(users.bob),
            Path(transaction.id),
            Form(edited_form("10")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(must_get(&state.db_connection, &transaction), transaction);
    }

    #[tokio::test]
    async fn forbidden_takes_priority_over_invalid_input() {
        let (state, users, transaction) = setup();

        let response = edit_transaction_endpoint(
            State(state),
            Extension(users.bob),
            Path(transaction.id),
            Form(edited_form("-1")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (state, users, _) = setup();

        let response = edit_transaction_endpoint(
            State(state),
            Extension(users.alice),
            Path(999),
            Form(edited_form("10")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_amount_rerenders_form() {
        let (state, users, transaction) = setup();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(users.alice),
            Path(transaction.id),
            Form(edited_form("0")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Amount must be greater than zero.");
        assert_eq!(must_get(&state.db_connection, &transaction), transaction);
    }
}
