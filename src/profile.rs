//! The profile page where a user can change their username.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{User, Username, update_username},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner, username_input},
    navigation::NavBar,
};

fn profile_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-put=(endpoints::PROFILE_API)
            hx-swap="outerHTML"
            hx-target-error="this"
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            (username_input(username, error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Save Changes"
            }
        }
    }
}

/// Display the logged in user's profile.
pub async fn get_profile_page(Extension(user): Extension<User>) -> Response {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full mb-4 text-2xl font-bold" { "Profile" }

            @if user.is_superuser {
                p id="superuser-badge" class="w-full mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    "You are a superuser and can change records created by any user."
                }
            }

            (profile_form(user.username.as_ref(), None))
        }
    };

    base("Profile", &[], &content).into_response()
}

/// The state needed for updating the profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted by the profile form.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileForm {
    pub username: String,
}

fn invalid_profile_response(username: &str, error_message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        profile_form(username, Some(error_message)),
    )
        .into_response()
}

/// Change the logged in user's username, then reload the profile page.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user): Extension<User>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let username = match Username::new(&form.username) {
        Ok(username) => username,
        Err(error) => return invalid_profile_response(&form.username, &error.to_string()),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => update_username(user.id, &username, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("User {} changed their username to {username}", user.id);
            (
                HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateUsername) => {
            invalid_profile_response(username.as_ref(), "A user with that username already exists.")
        }
        Err(error) => error.into_alert_response(),
    }
}
