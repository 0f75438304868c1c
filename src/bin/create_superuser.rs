use std::{
    error::Error,
    io::{self, Write},
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{PasswordHash, Username, ValidatedPassword, create_user, initialize_db};

/// A utility for creating a user that may change the records of every user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. It is created if it does not exist.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let Some(username) = get_username()? else {
        return Ok(());
    };
    let Some(password_hash) = get_password_hash(username.as_ref()) else {
        return Ok(());
    };

    match create_user(username, password_hash, true, &connection) {
        Ok(user) => {
            println!("Created superuser {} with ID {}", user.username, user.id);
            Ok(())
        }
        Err(error) => {
            print_error(error);
            exit(1);
        }
    }
}

/// Prompt for a username until a valid one is entered, returning `None` on ctrl+d.
fn get_username() -> Result<Option<Username>, io::Error> {
    loop {
        print!("Username: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match Username::new(&line) {
            Ok(username) => return Ok(Some(username)),
            Err(error) => print_error(error),
        }
    }
}

/// Prompt for a password twice, returning `None` if the user gives up with ctrl+d.
fn get_password_hash(username: &str) -> Option<PasswordHash> {
    loop {
        let first_password = prompt_password("Password: ")?;

        if let Err(error) = ValidatedPassword::new_with_user_inputs(&first_password, &[username]) {
            print_error(error);
            continue;
        }

        let second_password = prompt_password("Password (again): ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::from_raw_password(&first_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => print_error(format!("Could not hash password: {error}. Try again.")),
        }
    }
}

fn prompt_password(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
