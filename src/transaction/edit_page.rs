//! The page for editing an existing transaction.

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
    database_id::TransactionId,
    transaction::{
        core::get_transaction_for_mutation,
        form::{FormAction, TransactionForm, transaction_form_page},
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for accessing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the form for editing a transaction, prefilled with its current values.
///
/// Only the owner of the transaction or a superuser may see this page.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user): Extension<User>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transaction_for_mutation(transaction_id, &user, &connection)?
    };

    let form = TransactionForm::from(&transaction);

    Ok(
        transaction_form_page("Edit Transaction", FormAction::Edit(transaction_id), &form)
            .into_response(),
    )
}
