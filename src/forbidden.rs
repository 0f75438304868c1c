//! The page shown when a user tries to change a record they do not own.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub fn get_403_forbidden_response() -> Response {
    let page = error_view(
        "Forbidden",
        "403",
        "You can't do that.",
        "This record belongs to another user. You can only change records that you created.",
    );

    (StatusCode::FORBIDDEN, Html(page.into_string())).into_response()
}
