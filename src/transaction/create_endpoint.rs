//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    endpoints,
    timezone::get_local_today,
    transaction::{
        core::create_transaction,
        form::{FormAction, TransactionForm, ValidatedTransaction, invalid_form_response},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction owned by the logged in user,
/// redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user): Extension<User>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match get_local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = match ValidatedTransaction::new(&form, today) {
        Ok(transaction) => transaction,
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

    if let Err(error) = create_transaction(user.id, &transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_redirect,
            must_create_test_db, must_get_form, parse_html_fragment,
        },
        transaction::{
            TransactionKind, count_transactions, form::TransactionForm, get_transactions_by_owner,
        },
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn salary_form(amount: &str) -> TransactionForm {
        TransactionForm {
            title: "Salary".to_owned(),
            amount: amount.to_owned(),
            transaction_type: "Income".to_owned(),
            category: "Salary".to_owned(),
            date: "2025-03-01".to_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (db_connection, users) = must_create_test_db();
        let state = CreateTransactionState {
            db_connection: db_connection.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = create_transaction_endpoint(
            State(state),
            Extension(users.alice.clone()),
            Form(salary_form("1000")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let connection = db_connection.lock().unwrap();
        let transactions = get_transactions_by_owner(users.alice.id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].owner, users.alice.id);
        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[0].amount.to_string(), "1000.00");
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_and_not_saved() {
        let (db_connection, users) = must_create_test_db();
        let state = CreateTransactionState {
            db_connection: db_connection.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = create_transaction_endpoint(
            State(state),
            Extension(users.alice),
            Form(salary_form("0")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Amount must be greater than zero.");
        assert_eq!(count_transactions(&db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn rejected_form_keeps_entered_values() {
        let (db_connection, users) = must_create_test_db();
        let state = CreateTransactionState {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        };
        let form = TransactionForm {
            title: String::new(),
            ..salary_form("12.50")
        };

        let response =
            create_transaction_endpoint(State(state), Extension(users.bob), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Title cannot be empty.");
        assert_form_input_with_value(&form, "amount", "12.50");
    }
}
