//! User accounts, passwords and cookie based sessions.

mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use forgot_password::get_forgot_password_page;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::normalize_redirect_url;
pub use register_user::{get_register_page, register_user};
pub(super) use token::Token;
pub use user::{
    USERNAME_MAX_LENGTH, User, UserID, Username, create_user, create_user_table, get_user_by_id,
    get_user_by_username, update_password, update_username,
};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
