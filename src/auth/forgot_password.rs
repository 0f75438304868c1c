//! Instructions for resetting a forgotten password.
//!
//! There is no email based reset flow. An administrator resets the password
//! with the `reset_password` program on the machine running the server.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, base, log_in_register},
};

fn forgot_password_instructions() -> Markup {
    html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p class="text-justify"
            {
                "Ask the administrator of this server to reset your password. They
                can do this by running the program "
                code { "reset_password" }
                " with your username and the path to the database file."
            }

            pre class="p-2 rounded text-sm bg-gray-100 dark:bg-gray-700 overflow-x-auto"
            {
                "reset_password --db-path finance.db --username <your username>"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Remembered it? "
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Log in here" }
            }
        }
    }
}

/// Display the instructions for resetting a password.
pub async fn get_forgot_password_page() -> Response {
    let content = log_in_register("Forgot your password?", &forgot_password_instructions());

    base("Forgot Password", &[], &content).into_response()
}
