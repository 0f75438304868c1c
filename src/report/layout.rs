//! The contents of the downloadable report, independent of how it is drawn.

use time::Date;

use crate::{
    budget::Budget,
    dashboard::{Summary, most_recent},
    html::format_currency,
    transaction::Transaction,
};

/// A titled table of text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub heading: String,
    pub columns: Vec<String>,
    /// Each row has one cell per column, except for the single cell shown
    /// when the table is empty.
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(heading: &str, columns: &[&str], rows: Vec<Vec<String>>, empty_message: &str) -> Self {
        let rows = if rows.is_empty() {
            vec![vec![empty_message.to_owned()]]
        } else {
            rows
        };

        Self {
            heading: heading.to_owned(),
            columns: columns.iter().map(|&column| column.to_owned()).collect(),
            rows,
        }
    }
}

/// A user's finances laid out as a title and a list of tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub tables: Vec<ReportTable>,
}

/// Lay out the report for `transactions` and `budgets` generated on `today`.
///
/// Transactions are listed newest first and budgets by the most recent start date.
pub fn build_report(
    summary: &Summary,
    transactions: &[Transaction],
    budgets: &[Budget],
    today: Date,
) -> Report {
    let summary_table = ReportTable::new(
        "Summary",
        &["Total", "Amount"],
        vec![
            vec!["Total Income".to_owned(), format_currency(summary.total_income)],
            vec!["Total Expenses".to_owned(), format_currency(summary.total_expenses)],
            vec!["Net Balance".to_owned(), format_currency(summary.net_balance)],
            vec!["Total Budgeted".to_owned(), format_currency(summary.total_budgeted)],
        ],
        "",
    );

    let transaction_rows = most_recent(transactions, transactions.len())
        .into_iter()
        .map(|transaction| {
            vec![
                transaction.date.to_string(),
                transaction.title,
                format_currency(transaction.amount.as_decimal()),
                transaction.kind.to_string(),
                transaction.category,
            ]
        })
        .collect();

    let mut budgets = budgets.to_vec();
    budgets.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.id.cmp(&a.id))
    });
    let budget_rows = budgets
        .into_iter()
        .map(|budget| {
            vec![
                budget.category,
                format_currency(budget.amount.as_decimal()),
                budget.start_date.to_string(),
                budget
                    .end_date
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "Ongoing".to_owned()),
            ]
        })
        .collect();

    Report {
        title: format!("Finance Report ({today})"),
        tables: vec![
            summary_table,
            ReportTable::new(
                "Transactions",
                &["Date", "Title", "Amount", "Type", "Category"],
                transaction_rows,
                "No transactions",
            ),
            ReportTable::new(
                "Budgets",
                &["Category", "Amount", "Start Date", "End Date"],
                budget_rows,
                "No budgets",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        budget::Budget,
        dashboard::summarize,
        transaction::{PaymentMethod, Transaction, TransactionKind},
    };

    use super::build_report;

    fn transaction(id: i64, title: &str, date: Date) -> Transaction {
        Transaction {
            id,
            owner: UserID::new(1),
            title: title.to_owned(),
            amount: "12.5".parse().unwrap(),
            kind: TransactionKind::Expense,
            category: "Food".to_owned(),
            date,
            notes: None,
            recurring: false,
            payment_method: PaymentMethod::Card,
        }
    }

    fn budget(id: i64, start_date: Date, end_date: Option<Date>) -> Budget {
        Budget {
            id,
            owner: UserID::new(1),
            category: format!("Budget {id}"),
            amount: "100".parse().unwrap(),
            start_date,
            end_date,
            notes: None,
        }
    }

    #[test]
    fn empty_report_has_placeholder_rows() {
        let report = build_report(&summarize(&[], &[]), &[], &[], date!(2025 - 06 - 01));

        assert_eq!(report.title, "Finance Report (2025-06-01)");
        assert_eq!(report.tables.len(), 3);
        assert_eq!(report.tables[0].rows[0], vec!["Total Income", "$0.00"]);
        assert_eq!(report.tables[1].rows, vec![vec!["No transactions".to_owned()]]);
        assert_eq!(report.tables[2].rows, vec![vec!["No budgets".to_owned()]]);
    }

    #[test]
    fn transactions_are_listed_newest_first() {
        let transactions = [
            transaction(1, "Old", date!(2025 - 01 - 01)),
            transaction(2, "New", date!(2025 - 02 - 01)),
            transaction(3, "Same day, created later", date!(2025 - 01 - 01)),
        ];

        let report = build_report(
            &summarize(&transactions, &[]),
            &transactions,
            &[],
            date!(2025 - 06 - 01),
        );

        let titles = report.tables[1]
            .rows
            .iter()
            .map(|row| row[1].as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["New", "Same day, created later", "Old"]);
        assert_eq!(
            report.tables[1].rows[0],
            vec!["2025-02-01", "New", "$12.50", "Expense", "Food"]
        );
    }

    #[test]
    fn budgets_are_listed_by_latest_start_with_ongoing_end() {
        let budgets = [
            budget(1, date!(2025 - 01 - 01), Some(date!(2025 - 01 - 31))),
            budget(2, date!(2025 - 03 - 01), None),
        ];

        let report = build_report(
            &summarize(&[], &budgets),
            &[],
            &budgets,
            date!(2025 - 06 - 01),
        );

        assert_eq!(
            report.tables[2].rows,
            vec![
                vec!["Budget 2", "$100.00", "2025-03-01", "Ongoing"],
                vec!["Budget 1", "$100.00", "2025-01-01", "2025-01-31"],
            ]
        );
        assert_eq!(report.tables[0].rows[3], vec!["Total Budgeted", "$200.00"]);
    }
}
