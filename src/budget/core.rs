//! The budget model and the database functions for storing budgets.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::{User, UserID},
    budget::form::ValidatedBudget,
    database_id::BudgetId,
    db::RowsAffected,
    money::Money,
    ownership::{Owned, ensure_can_mutate},
};

/// A spending limit for a category over a period of time.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    /// The user that set the budget.
    pub owner: UserID,
    pub category: String,
    /// The most that should be spent in `category`.
    pub amount: Money,
    pub start_date: Date,
    /// The last day of the budget, or `None` if the budget has no end.
    pub end_date: Option<Date>,
    pub notes: Option<String>,
}

impl Owned for Budget {
    fn owner(&self) -> UserID {
        self.owner
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, category, amount, start_date, end_date, notes FROM budget";

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                amount TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT,
                notes TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id);",
        (),
    )?;

    Ok(())
}

/// Create a new budget owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `owner` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    owner: UserID,
    budget: &ValidatedBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount, start_date, end_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, category, amount, start_date, end_date, notes",
        )?
        .query_row(
            (
                owner.as_i64(),
                &budget.category,
                budget.amount,
                budget.start_date,
                budget.end_date,
                &budget.notes,
            ),
            map_budget_row,
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

/// Retrieve a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Retrieve the budget `id` if `actor` may edit or delete it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - [Error::Forbidden] if `actor` is not allowed to change the budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget_for_mutation(
    id: BudgetId,
    actor: &User,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = get_budget(id, connection)?;
    ensure_can_mutate(actor, &budget)?;

    Ok(budget)
}

/// Get the budgets owned by `owner`, the most recent start date first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets_by_owner(owner: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id ORDER BY start_date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &owner.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Replace the editable fields of the budget `id`. The owner never changes.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn update_budget(
    id: BudgetId,
    budget: &ValidatedBudget,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE budget SET \
                category = ?1, \
                amount = ?2, \
                start_date = ?3, \
                end_date = ?4, \
                notes = ?5 \
            WHERE id = ?6",
            (
                &budget.category,
                budget.amount,
                budget.start_date,
                budget.end_date,
                &budget.notes,
                id,
            ),
        )
        .map_err(Error::from)
}

/// Delete the budget `id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
pub fn count_budgets(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM budget;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        notes: row.get(6)?,
    })
}

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        Error,
        auth::UserID,
        budget::{
            ValidatedBudget, count_budgets, create_budget, delete_budget, get_budget,
            get_budgets_by_owner, update_budget,
        },
        test_utils::must_create_test_db,
    };

    fn food_budget(start_date: time::Date) -> ValidatedBudget {
        ValidatedBudget {
            category: "Food".to_owned(),
            amount: "300".parse().unwrap(),
            start_date,
            end_date: None,
            notes: None,
        }
    }

    #[test]
    fn create_succeeds() {
        let (db_connection, users) = must_create_test_db();
        let conn = db_connection.lock().unwrap();

        let budget = create_budget(users.alice.id, &food_budget(date!(2025 - 01 - 01)), &conn)
            .unwrap();

        assert_eq!(budget.owner, users.alice.id);
        assert_eq!(budget.amount.to_string(), "300.00");
        assert_eq!(budget.end_date, None);
        assert_eq!(get_budget(budget.id, &conn), Ok(budget));
    }

    #[test]
    fn create_fails_for_missing_owner() {
        let (db_connection, _) = must_create_test_db();
        let conn = db_connection.lock().unwrap();

        let result = create_budget(UserID::new(999), &food_budget(date!(2025 - 01 - 01)), &conn);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(count_budgets(&conn), Ok(0));
    }

    #[test]
    fn get_by_owner_orders_by_most_recent_start() {
        let (db_connection, users) = must_create_test_db();
        let conn = db_connection.lock().unwrap();
        let january =
            create_budget(users.alice.id, &food_budget(date!(2025 - 01 - 01)), &conn).unwrap();
        let march =
            create_budget(users.alice.id, &food_budget(date!(2025 - 03 - 01)), &conn).unwrap();
        create_budget(users.bob.id, &food_budget(date!(2025 - 02 - 01)), &conn).unwrap();

        let got = get_budgets_by_owner(users.alice.id, &conn).unwrap();

        assert_eq!(got, vec![march, january]);
    }

    #[test]
    fn update_keeps_owner() {
        let (db_connection, users) = must_create_test_db();
        let conn = db_connection.lock().unwrap();
        let budget =
            create_budget(users.alice.id, &food_budget(date!(2025 - 01 - 01)), &conn).unwrap();
        let edit = ValidatedBudget {
            category: "Groceries".to_owned(),
            end_date: Some(date!(2025 - 01 - 31)),
            ..food_budget(date!(2025 - 01 - 01))
        };

        assert_eq!(update_budget(budget.id, &edit, &conn), Ok(1));

        let got = get_budget(budget.id, &conn).unwrap();
        assert_eq!(got.owner, users.alice.id);
        assert_eq!(got.category, "Groceries");
        assert_eq!(got.end_date, Some(date!(2025 - 01 - 31)));
    }

    #[test]
    fn delete_removes_budget() {
        let (db_connection, users) = must_create_test_db();
        let conn = db_connection.lock().unwrap();
        let budget =
            create_budget(users.alice.id, &food_budget(date!(2025 - 01 - 01)), &conn).unwrap();

        assert_eq!(delete_budget(budget.id, &conn), Ok(1));
        assert_eq!(delete_budget(budget.id, &conn), Ok(0));
        assert_eq!(get_budget(budget.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn deleting_user_deletes_their_budgets() {
        let (db_connection, users) = must_create_test_db();
        let conn = db_connection.lock().unwrap();
        create_budget(users.alice.id, &food_budget(date!(2025 - 01 - 01)), &conn).unwrap();
        create_budget(users.bob.id, &food_budget(date!(2025 - 01 - 01)), &conn).unwrap();

        conn.execute("DELETE FROM user WHERE id = ?1", [users.alice.id.as_i64()])
            .unwrap();

        assert_eq!(count_budgets(&conn), Ok(1));
    }
}
