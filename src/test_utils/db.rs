use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, User, Username, create_user},
    db::initialize,
};

/// The users in a fresh test database.
pub(crate) struct TestUsers {
    /// A regular user.
    pub alice: User,
    /// Another regular user.
    pub bob: User,
    /// A superuser.
    pub admin: User,
}

/// An in-memory database with the tables and the users in [TestUsers].
#[track_caller]
pub(crate) fn must_create_test_db() -> (Arc<Mutex<Connection>>, TestUsers) {
    let connection = Connection::open_in_memory().expect("could not open test database");
    initialize(&connection).expect("could not initialize test database");

    let create = |username: &str, is_superuser: bool| {
        create_user(
            Username::new_unchecked(username),
            PasswordHash::new_unchecked("hunter2"),
            is_superuser,
            &connection,
        )
        .expect("could not create test user")
    };
    let users = TestUsers {
        alice: create("alice", false),
        bob: create("bob", false),
        admin: create("admin", true),
    };

    (Arc::new(Mutex::new(connection)), users)
}
