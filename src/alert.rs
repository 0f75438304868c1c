//! Alert messages that are swapped into the page's alert container by HTMX.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const ERROR_ALERT_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
    text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// A dismissable error message with a short summary and optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div role="alert" class=(ERROR_ALERT_STYLE)
            {
                div class="flex-1"
                {
                    span class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                    class="font-bold"
                {
                    "×"
                }
            }
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}
