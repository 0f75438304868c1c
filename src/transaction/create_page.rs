//! Defines the route handler for the page for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    timezone::get_local_today,
    transaction::{
        PaymentMethod, TransactionKind,
        form::{FormAction, TransactionForm, transaction_form_page},
    },
};

/// The state needed for create new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
///
/// The date defaults to today in the server's timezone.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let form = TransactionForm {
        transaction_type: TransactionKind::Expense.as_str().to_owned(),
        date: today.to_string(),
        payment_method: PaymentMethod::default().as_str().to_owned(),
        ..Default::default()
    };

    Ok(transaction_form_page("New Transaction", FormAction::Create, &form).into_response())
}
