//! Sets up the application database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, budget::create_budget_table,
    transaction::create_transaction_table,
};

/// The number of rows changed by an `UPDATE` or `DELETE` query.
pub type RowsAffected = usize;

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign key checks are switched on for `connection` so that deleting a user
/// also deletes their transactions and budgets.
///
/// # Errors
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
