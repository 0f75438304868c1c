//! The public landing page with a motivational quote.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, base},
    quote::{Quote, QuoteClient},
};

/// The state needed for the landing page.
#[derive(Debug, Clone)]
pub struct LandingPageState {
    pub quote_client: QuoteClient,
}

impl FromRef<AppState> for LandingPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            quote_client: state.quote_client.clone(),
        }
    }
}

/// Display the landing page.
///
/// The quote service is best effort, the page shows a fixed quote when it is
/// slow or unavailable.
pub async fn get_landing_page(State(state): State<LandingPageState>) -> Response {
    let quote = state.quote_client.fetch_or_fallback().await;

    landing_view(&quote).into_response()
}

fn landing_view(quote: &Quote) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl mt-16 space-y-8 text-center"
            {
                h1 class="text-4xl font-bold tracking-tight" { "Finance Tracker" }

                p class="text-lg text-gray-600 dark:text-gray-300"
                {
                    "Record your income and expenses, set budgets and see where your money goes."
                }

                figure id="quote" class="p-6 rounded-lg bg-white shadow dark:bg-gray-800"
                {
                    blockquote class="text-xl italic" { "\u{201c}" (quote.content) "\u{201d}" }
                    figcaption class="mt-4 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "- " (quote.author)
                    }
                }

                div class="flex flex-col gap-2 sm:flex-row"
                {
                    a href=(endpoints::LOG_IN_VIEW) class=(BUTTON_PRIMARY_STYLE) { "Log in" }
                    a href=(endpoints::REGISTER_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Create account" }
                }
            }
        }
    };

    base("Welcome", &[], &content)
}
