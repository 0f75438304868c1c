//! The page listing the logged in user's transactions, with filters and sorting.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, EXPENSE_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        INCOME_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    transaction::{
        Transaction, TransactionKind,
        core::get_transactions_by_owner,
        query::{SortOrder, TransactionQuery, TransactionQueryParams},
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for accessing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the logged in user's transactions, filtered and sorted by the query string.
///
/// Only transactions owned by the logged in user are ever listed.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user): Extension<User>,
    Query(params): Query<TransactionQueryParams>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_by_owner(user.id, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let transactions = TransactionQuery::from(&params).apply(transactions);

    Ok(transactions_view(&transactions, &params).into_response())
}

pub fn kind_badge(kind: TransactionKind) -> Markup {
    let style = match kind {
        TransactionKind::Income => INCOME_BADGE_STYLE,
        TransactionKind::Expense => EXPENSE_BADGE_STYLE,
    };

    html!( span class=(style) { (kind.as_str()) } )
}

fn delete_confirm_message(transaction: &Transaction) -> String {
    format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.title
    )
}

fn filter_form(params: &TransactionQueryParams) -> Markup {
    let value = |param: &Option<String>| param.clone().unwrap_or_default();
    let selected_type = value(&params.transaction_type);
    let selected_sort = value(&params.sort_by);

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-6 items-end w-full"
        {
            div
            {
                label for="transaction_type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="transaction_type" id="transaction_type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All" }

                    @for kind in TransactionKind::ALL {
                        option value=(kind.as_str()) selected[selected_type == kind.as_str()]
                        {
                            (kind.as_str())
                        }
                    }
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    placeholder="e.g., Food"
                    value=(value(&params.category))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=(value(&params.start_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    value=(value(&params.end_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="sort_by" class=(FORM_LABEL_STYLE) { "Sort by" }

                select name="sort_by" id="sort_by" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Date added" }

                    @for order in SortOrder::ALL {
                        option value=(order.as_str()) selected[selected_sort == order.as_str()]
                        {
                            (order.label())
                        }
                    }
                }
            }

            div class="flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn transactions_view(transactions: &[Transaction], params: &TransactionQueryParams) -> Markup {
    let create_transaction_page_url = endpoints::NEW_TRANSACTION_VIEW;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let table_row = |transaction: &Transaction| {
        let action_links = edit_delete_action_links(
            &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
            &format_endpoint(endpoints::TRANSACTION, transaction.id),
            &delete_confirm_message(transaction),
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(transaction.date) { (transaction.date) }
                }

                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (transaction.title)

                    @if transaction.recurring {
                        span class="ml-2 text-xs text-gray-500 dark:text-gray-400" { "(recurring)" }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (transaction.category) }

                td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(transaction.amount.as_decimal()))
                }

                td class=(TABLE_CELL_STYLE) { (transaction.payment_method.label()) }

                td class=(TABLE_CELL_STYLE) { (action_links) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(create_transaction_page_url) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                (filter_form(params))

                (transactions_cards_view(transactions, create_transaction_page_url))

                section class="hidden lg:block w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (table_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found. Add a transaction "
                                        a href=(create_transaction_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transactions_cards_view(
    transactions: &[Transaction],
    create_transaction_page_url: &str,
) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for transaction in transactions {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-transaction-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        { (transaction.title) }
                        div class="text-sm tabular-nums text-right text-gray-900 dark:text-white"
                        { (format_currency(transaction.amount.as_decimal())) }
                    }

                    div class="mt-1 flex items-center gap-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        time datetime=(transaction.date) { (transaction.date) }
                        span { (transaction.category) }
                        (kind_badge(transaction.kind))
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (edit_delete_action_links(
                            &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
                            &format_endpoint(endpoints::TRANSACTION, transaction.id),
                            &delete_confirm_message(transaction),
                        ))
                    }
                }
            }

            @if transactions.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No transactions found. Add a transaction "
                    a href=(create_transaction_page_url) class=(LINK_STYLE)
                    {
                        "here"
                    }
                    "."
                }
            }
        }
    )
}
