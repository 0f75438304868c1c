//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::User,
    budget::{Budget, get_budgets_by_owner},
    dashboard::{
        aggregation::{
            CategoryTotal, MonthlyTotal, Summary, category_breakdown, monthly_totals,
            most_recent, summarize,
        },
        charts::{DashboardChart, chart_container, charts_script, monthly_chart},
        tables::{category_table, recent_transactions_table, summary_cards},
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    timezone::get_local_today,
    transaction::{Transaction, TransactionKind, get_transactions_by_owner},
};

/// The number of transactions listed under "Recent Transactions".
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything shown on the dashboard, computed from the logged in user's records.
struct DashboardData {
    summary: Summary,
    monthly_totals: Vec<MonthlyTotal>,
    income_by_category: Vec<CategoryTotal>,
    expenses_by_category: Vec<CategoryTotal>,
    recent_transactions: Vec<Transaction>,
}

impl DashboardData {
    fn new(transactions: &[Transaction], budgets: &[Budget], today: Date) -> Self {
        Self {
            summary: summarize(transactions, budgets),
            monthly_totals: monthly_totals(transactions, today),
            income_by_category: category_breakdown(transactions, TransactionKind::Income),
            expenses_by_category: category_breakdown(transactions, TransactionKind::Expense),
            recent_transactions: most_recent(transactions, RECENT_TRANSACTION_COUNT),
        }
    }
}

/// Display a page with an overview of the logged in user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let (transactions, budgets) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_transactions_by_owner(user.id, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
        let budgets = get_budgets_by_owner(user.id, &connection)
            .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;

        (transactions, budgets)
    };

    let data = DashboardData::new(&transactions, &budgets, today);

    Ok(dashboard_view(&data).into_response())
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = DashboardChart {
        id: "monthly-chart",
        options: monthly_chart(&data.monthly_totals).to_string(),
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards(&data.summary))

            @if data.recent_transactions.is_empty() {
                p class="mb-8"
                {
                    "Charts will show up here once you add some transactions. \
                    You can add a transaction " (link(endpoints::NEW_TRANSACTION_VIEW, "here")) "."
                }
            }

            section id="charts" class="w-full mx-auto mb-8"
            {
                (chart_container(&chart))
            }

            section class="w-full grid grid-cols-1 xl:grid-cols-2 gap-4 mb-8"
            {
                (category_table("income-by-category", "Income by Category", &data.income_by_category))
                (category_table("expenses-by-category", "Expenses by Category", &data.expenses_by_category))
            }

            @if !data.recent_transactions.is_empty() {
                (recent_transactions_table(&data.recent_transactions))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&[chart]),
    ];

    base("Dashboard", &scripts, &content)
}
