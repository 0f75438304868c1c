//! Transactions: the income and expenses recorded by users.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing it
//! - Form parsing and validation
//! - Filtering and sorting for the transactions page
//! - The page and endpoint handlers

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod query;
mod transactions_page;

pub use core::{
    PaymentMethod, Transaction, TransactionKind, create_transaction_table,
    get_transactions_by_owner,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::ValidatedTransaction;
pub use transactions_page::{get_transactions_page, kind_badge};

#[cfg(test)]
pub use core::{
    count_transactions, create_transaction, delete_transaction, get_transaction, update_transaction,
};
