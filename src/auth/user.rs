//! Code for creating the user table and fetching users from the database.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The maximum number of characters in a username.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// A name that a user logs in with.
///
/// Usernames are 1-150 characters long and only contain letters, digits and
/// the characters `@`, `.`, `+`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create and validate a username.
    ///
    /// Leading and trailing whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] with a message for the user if the
    /// username is empty, too long, or contains characters that are not allowed.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(Error::InvalidUsername(
                "Username cannot be empty.".to_owned(),
            ));
        }

        if username.graphemes(true).count() > USERNAME_MAX_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "Username must have at most {USERNAME_MAX_LENGTH} characters."
            )));
        }

        let is_allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !username.chars().all(is_allowed) {
            return Err(Error::InvalidUsername(
                "Username may only contain letters, numbers, and @/./+/-/_ characters.".to_owned(),
            ));
        }

        Ok(Self(username.to_owned()))
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure that `raw_username` is a valid username.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }
}

impl FromStr for Username {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Username::new(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` and `username` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Superusers may change records owned by any user.
    pub is_superuser: bool,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                is_superuser INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;
    let is_superuser = row.get(3)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        is_superuser,
    })
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::DuplicateUsername] if the username is taken, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    is_superuser: bool,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, password, is_superuser) VALUES (?1, ?2, ?3)",
        (username.as_ref(), password_hash.to_string(), is_superuser),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        password_hash,
        is_superuser,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, is_superuser FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with the name `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the name `username`.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, username, password, is_superuser FROM user WHERE username = :username",
        )?
        .query_row(&[(":username", &username)], map_user_row)
        .map_err(|error| error.into())
}

/// Change the name of the user `user_id`.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if another user already has the name,
/// or [Error::NotFound] if the user does not exist.
pub fn update_username(
    user_id: UserID,
    username: &Username,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET username = ?1 WHERE id = ?2",
        (username.as_ref(), user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Replace the password hash of the user `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.to_string(), user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}


#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, user::Username},
    };

    use super::{
        UserID, create_user, create_user_table, get_user_by_id, get_user_by_username,
        update_password, update_username,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            Username::new_unchecked("alice"),
            password_hash.clone(),
            false,
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.password_hash, password_hash);
        assert!(!inserted_user.is_superuser);
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let db_connection = get_db_connection();
        create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            false,
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter3"),
            false,
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn get_user_by_id_and_username() {
        let db_connection = get_db_connection();
        let want = create_user(
            Username::new_unchecked("root"),
            PasswordHash::new_unchecked("hunter2"),
            true,
            &db_connection,
        )
        .unwrap();

        assert_eq!(get_user_by_id(want.id, &db_connection), Ok(want.clone()));
        assert_eq!(get_user_by_username("root", &db_connection), Ok(want));
    }

    #[test]
    fn get_missing_user_is_not_found() {
        let db_connection = get_db_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &db_connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_user_by_username("nobody", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_username_and_password() {
        let db_connection = get_db_connection();
        let user = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            false,
            &db_connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_username(user.id, &Username::new_unchecked("alicia"), &db_connection).unwrap();
        update_password(user.id, &new_hash, &db_connection).unwrap();

        let got = get_user_by_id(user.id, &db_connection).unwrap();
        assert_eq!(got.username.as_ref(), "alicia");
        assert_eq!(got.password_hash, new_hash);
    }

    #[test]
    fn update_missing_user_is_not_found() {
        let db_connection = get_db_connection();

        assert_eq!(
            update_username(
                UserID::new(7),
                &Username::new_unchecked("ghost"),
                &db_connection
            ),
            Err(Error::NotFound)
        );
    }
}
