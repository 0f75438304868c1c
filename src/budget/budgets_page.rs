use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::User,
    budget::core::{Budget, get_budgets_by_owner},
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

#[derive(Debug, Clone)]
pub struct BudgetsViewState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the logged in user's budgets, the most recent start date first.
pub async fn get_budgets_page(
    State(state): State<BudgetsViewState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let budgets = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_budgets_by_owner(user.id, &connection)
            .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?
    };

    Ok(budgets_view(&budgets).into_response())
}

fn end_date_text(budget: &Budget) -> String {
    budget
        .end_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "Ongoing".to_owned())
}

fn budget_action_links(budget: &Budget) -> Markup {
    edit_delete_action_links(
        &format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id),
        &format_endpoint(endpoints::BUDGET, budget.id),
        &format!(
            "Are you sure you want to delete the budget for '{}'? This cannot be undone.",
            budget.category
        ),
    )
}

fn budgets_view(budgets: &[Budget]) -> Markup {
    let create_budget_page_url = endpoints::NEW_BUDGET_VIEW;
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let empty_message = html!(
        "No budgets yet. Add a budget "
        a href=(create_budget_page_url) class=(LINK_STYLE) { "here" }
        "."
    );

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Budgets" }

                    a href=(create_budget_page_url) class=(LINK_STYLE) { "Add Budget" }
                }

                ul class="lg:hidden space-y-4"
                {
                    @for budget in budgets {
                        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                        {
                            div class="flex items-start justify-between gap-3"
                            {
                                div class="text-sm font-semibold text-gray-900 dark:text-white"
                                { (budget.category) }
                                div class="text-sm tabular-nums text-gray-900 dark:text-white"
                                { (format_currency(budget.amount.as_decimal())) }
                            }

                            div class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                            {
                                time datetime=(budget.start_date) { (budget.start_date) }
                                " to "
                                (end_date_text(budget))
                            }

                            div class="mt-2 flex items-center gap-4 text-sm"
                            {
                                (budget_action_links(budget))
                            }
                        }
                    }

                    @if budgets.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            (empty_message)
                        }
                    }
                }

                section class="hidden lg:block w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Start" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "End" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for budget in budgets {
                                tr class=(TABLE_ROW_STYLE) data-budget-row="true"
                                {
                                    th
                                        scope="row"
                                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                    {
                                        (budget.category)
                                    }

                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_currency(budget.amount.as_decimal()))
                                    }

                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        time datetime=(budget.start_date) { (budget.start_date) }
                                    }

                                    td class=(TABLE_CELL_STYLE) { (end_date_text(budget)) }

                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (budget.notes.as_deref().unwrap_or_default())
                                    }

                                    td class=(TABLE_CELL_STYLE) { (budget_action_links(budget)) }
                                }
                            }

                            @if budgets.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        (empty_message)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Budgets", &[], &content)
}
