//! Summary cards and tables for the dashboard.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    dashboard::aggregation::{CategoryTotal, Summary},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::{Transaction, kind_badge},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        TABLE_CELL_RED_STYLE
    } else {
        TABLE_CELL_GREEN_STYLE
    }
}

fn summary_card(id: &str, label: &str, amount: Decimal, amount_class: &str) -> Markup {
    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p class={"text-2xl font-bold tabular-nums " (amount_class)} { (format_currency(amount)) }
        }
    }
}

/// The four all-time totals as cards.
pub(super) fn summary_cards(summary: &Summary) -> Markup {
    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-8"
        {
            (summary_card("total-income", "Total Income", summary.total_income, TABLE_CELL_GREEN_STYLE))
            (summary_card("total-expenses", "Total Expenses", summary.total_expenses, TABLE_CELL_RED_STYLE))
            (summary_card(
                "net-balance",
                "Net Balance",
                summary.net_balance,
                amount_color_class(summary.net_balance),
            ))
            (summary_card("total-budgeted", "Total Budgeted", summary.total_budgeted, ""))
        }
    }
}

/// A table of the totals per category.
pub(super) fn category_table(id: &str, heading: &str, breakdown: &[CategoryTotal]) -> Markup {
    html! {
        div id=(id)
        {
            h3 class="text-xl font-semibold mb-4" { (heading) }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Total" }
                        }
                    }

                    tbody
                    {
                        @for category_total in breakdown {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                                {
                                    (category_total.category)
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(category_total.total))
                                }
                            }
                        }

                        @if breakdown.is_empty() {
                            tr
                            {
                                td colspan="2" class="px-6 py-4 text-center" { "Nothing recorded yet." }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A table of the most recent transactions.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div id="recent-transactions" class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    time datetime=(transaction.date) { (transaction.date) }
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.title) }
                                td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(transaction.amount.as_decimal()))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::Summary;

    use super::summary_cards;

    #[test]
    fn negative_net_balance_is_red() {
        let summary = Summary {
            total_income: dec!(10),
            total_expenses: dec!(20),
            net_balance: dec!(-10),
            total_budgeted: dec!(0),
        };

        let html = Html::parse_fragment(&summary_cards(&summary).into_string());

        let amount = html
            .select(&Selector::parse("#net-balance p.text-2xl").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.text().collect::<String>(), "-$10.00");
        assert!(amount.value().classes().any(|class| class == "text-red-600"));
    }
}
