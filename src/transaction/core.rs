//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{
    Error,
    auth::{User, UserID},
    database_id::TransactionId,
    db::RowsAffected,
    money::Money,
    ownership::{Owned, ensure_can_mutate},
    transaction::form::ValidatedTransaction,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money that was earned, e.g. a salary.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// Every kind, in the order they are shown in forms.
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    /// The value used in forms, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            _ => Err(()),
        }
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    /// Every payment method, in the order they are shown in forms.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
    ];

    /// The value used in forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// The name shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or(())
    }
}

macro_rules! text_column {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;

                text.parse().map_err(|_| {
                    FromSqlError::Other(format!("invalid {} \"{text}\"", stringify!($type)).into())
                })
            }
        }
    };
}

text_column!(TransactionKind);
text_column!(PaymentMethod);

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub owner: UserID,
    /// A short summary, e.g. "Weekly groceries".
    pub title: String,
    /// The amount of money spent or earned.
    pub amount: Money,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// Free text grouping such as "Food" or "Salary".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    pub notes: Option<String>,
    /// Whether the transaction repeats, e.g. rent.
    pub recurring: bool,
    pub payment_method: PaymentMethod,
}

impl Owned for Transaction {
    fn owner(&self) -> UserID {
        self.owner
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, amount, kind, category, date, notes, \
    recurring, payment_method FROM \"transaction\"";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('Income', 'Expense')),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT,
                recurring INTEGER NOT NULL DEFAULT 0,
                payment_method TEXT NOT NULL DEFAULT 'cash'
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `owner` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    owner: UserID,
    transaction: &ValidatedTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" \
                (user_id, title, amount, kind, category, date, notes, recurring, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, user_id, title, amount, kind, category, date, notes, recurring, \
                payment_method",
        )?
        .query_row(
            (
                owner.as_i64(),
                &transaction.title,
                transaction.amount,
                transaction.kind,
                &transaction.category,
                transaction.date,
                &transaction.notes,
                transaction.recurring,
                transaction.payment_method,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transaction `id` if `actor` may edit or delete it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::Forbidden] if `actor` is not allowed to change the transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction_for_mutation(
    id: TransactionId,
    actor: &User,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(id, connection)?;
    ensure_can_mutate(actor, &transaction)?;

    Ok(transaction)
}

/// Get all of the transactions owned by `owner` in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_by_owner(
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id ORDER BY id ASC"
        ))?
        .query_map(&[(":user_id", &owner.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the editable fields of the transaction `id`.
///
/// The owner of a transaction never changes.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: &ValidatedTransaction,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET \
                title = ?1, \
                amount = ?2, \
                kind = ?3, \
                category = ?4, \
                date = ?5, \
                notes = ?6, \
                recurring = ?7, \
                payment_method = ?8 \
            WHERE id = ?9",
            (
                &transaction.title,
                transaction.amount,
                transaction.kind,
                &transaction.category,
                transaction.date,
                &transaction.notes,
                transaction.recurring,
                transaction.payment_method,
                id,
            ),
        )
        .map_err(Error::from)
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
        date: row.get(6)?,
        notes: row.get(7)?,
        recurring: row.get(8)?,
        payment_method: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, Username, create_user},
        db::initialize,
        transaction::{
            PaymentMethod, TransactionKind, ValidatedTransaction, count_transactions,
            create_transaction, delete_transaction, get_transaction, get_transactions_by_owner,
            update_transaction,
        },
    };

    fn get_test_connection() -> (Connection, UserID, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let alice = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            false,
            &conn,
        )
        .unwrap();
        let bob = create_user(
            Username::new_unchecked("bob"),
            PasswordHash::new_unchecked("hunter3"),
            false,
            &conn,
        )
        .unwrap();

        (conn, alice.id, bob.id)
    }

    fn groceries(amount: &str) -> ValidatedTransaction {
        ValidatedTransaction {
            title: "Groceries".to_owned(),
            amount: amount.parse().unwrap(),
            kind: TransactionKind::Expense,
            category: "Food".to_owned(),
            date: date!(2025 - 10 - 05),
            notes: None,
            recurring: false,
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn create_succeeds() {
        let (conn, alice, _) = get_test_connection();

        let transaction = create_transaction(alice, &groceries("12.30"), &conn).unwrap();

        assert_eq!(transaction.owner, alice);
        assert_eq!(transaction.amount.to_string(), "12.30");
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.payment_method, PaymentMethod::Card);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_fails_for_missing_owner() {
        let (conn, _, _) = get_test_connection();

        let result = create_transaction(UserID::new(999), &groceries("1"), &conn);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let (conn, _, _) = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_by_owner_only_returns_owned_transactions_in_creation_order() {
        let (conn, alice, bob) = get_test_connection();
        let first = create_transaction(alice, &groceries("3"), &conn).unwrap();
        create_transaction(bob, &groceries("2"), &conn).unwrap();
        let second = create_transaction(alice, &groceries("1"), &conn).unwrap();

        let got = get_transactions_by_owner(alice, &conn).unwrap();

        assert_eq!(got, vec![first, second]);
    }

    #[test]
    fn update_keeps_owner() {
        let (conn, alice, _) = get_test_connection();
        let transaction = create_transaction(alice, &groceries("3"), &conn).unwrap();
        let mut edit = groceries("4.50");
        edit.title = "Dinner".to_owned();
        edit.notes = Some("Pizza".to_owned());

        let rows_affected = update_transaction(transaction.id, &edit, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(got.owner, alice);
        assert_eq!(got.title, "Dinner");
        assert_eq!(got.amount.to_string(), "4.50");
        assert_eq!(got.notes.as_deref(), Some("Pizza"));
    }

    #[test]
    fn delete_removes_transaction() {
        let (conn, alice, _) = get_test_connection();
        let transaction = create_transaction(alice, &groceries("3"), &conn).unwrap();

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(1));
        assert_eq!(delete_transaction(transaction.id, &conn), Ok(0));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn deleting_user_deletes_their_transactions() {
        let (conn, alice, bob) = get_test_connection();
        create_transaction(alice, &groceries("3"), &conn).unwrap();
        create_transaction(bob, &groceries("3"), &conn).unwrap();

        conn.execute("DELETE FROM user WHERE id = ?1", [alice.as_i64()])
            .unwrap();

        assert_eq!(count_transactions(&conn), Ok(1));
    }
}
