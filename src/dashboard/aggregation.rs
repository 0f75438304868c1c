//! Summaries of a user's transactions and budgets for the dashboard and report.
//!
//! Every total is computed with [Decimal] from the records as they are now,
//! nothing is cached between requests.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, Duration, Month};

use crate::{
    budget::Budget,
    transaction::{Transaction, TransactionKind},
};

/// How far back the monthly income and expense series goes.
pub const MONTHLY_WINDOW_DAYS: i64 = 180;

/// The all-time totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Income minus expenses, negative if the user spent more than they earned.
    pub net_balance: Decimal,
    /// The sum of every budget amount.
    pub total_budgeted: Decimal,
}

/// Calculate the all-time totals over `transactions` and `budgets`.
pub fn summarize(transactions: &[Transaction], budgets: &[Budget]) -> Summary {
    let total_income = sum_of_kind(transactions, TransactionKind::Income);
    let total_expenses = sum_of_kind(transactions, TransactionKind::Expense);
    let total_budgeted = budgets.iter().map(|budget| budget.amount.as_decimal()).sum();

    Summary {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
        total_budgeted,
    }
}

fn sum_of_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount.as_decimal())
        .sum()
}

/// The income and expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Income and expenses per month for the transactions dated within the last
/// [MONTHLY_WINDOW_DAYS] days up to and including `today`.
///
/// Every month that the window touches is included, oldest first, with zeros
/// for months without transactions.
pub fn monthly_totals(transactions: &[Transaction], today: Date) -> Vec<MonthlyTotal> {
    let window_start = today - Duration::days(MONTHLY_WINDOW_DAYS);

    let mut totals: Vec<MonthlyTotal> = months_between(window_start, today)
        .into_iter()
        .map(|month| MonthlyTotal {
            month,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        })
        .collect();

    let index_of_month: HashMap<Date, usize> = totals
        .iter()
        .enumerate()
        .map(|(index, total)| (total.month, index))
        .collect();

    for transaction in transactions {
        if transaction.date < window_start || transaction.date > today {
            continue;
        }

        let Some(&index) = index_of_month.get(&first_of_month(transaction.date)) else {
            continue;
        };

        let total = &mut totals[index];
        match transaction.kind {
            TransactionKind::Income => total.income += transaction.amount.as_decimal(),
            TransactionKind::Expense => total.expenses += transaction.amount.as_decimal(),
        }
    }

    totals
}

fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The first day of each month from the month of `start` to the month of `end`, inclusive.
fn months_between(start: Date, end: Date) -> Vec<Date> {
    let mut months = Vec::new();
    let mut month = first_of_month(start);
    let last = first_of_month(end);

    while month <= last {
        months.push(month);

        let Some(next) = next_month(month) else {
            break;
        };
        month = next;
    }

    months
}

fn next_month(first_of_month: Date) -> Option<Date> {
    let (year, month) = match first_of_month.month() {
        Month::December => (first_of_month.year() + 1, Month::January),
        month => (first_of_month.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).ok()
}

/// The total of a category's transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// The total per category of the transactions of `kind`, largest total first.
///
/// Categories with the same total are ordered by name.
pub fn category_breakdown(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| transaction.kind == kind) {
        *totals
            .entry(transaction.category.as_str())
            .or_insert(Decimal::ZERO) += transaction.amount.as_decimal();
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    breakdown
}

/// The `count` most recent transactions, newest first.
///
/// Transactions on the same day are ordered by most recently created.
pub fn most_recent(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    recent.truncate(count);

    recent
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        budget::Budget,
        transaction::{PaymentMethod, Transaction, TransactionKind},
    };

    use super::{
        CategoryTotal, MonthlyTotal, Summary, category_breakdown, monthly_totals, most_recent,
        summarize,
    };

    fn transaction(id: i64, amount: &str, kind: TransactionKind, category: &str, date: Date) -> Transaction {
        Transaction {
            id,
            owner: UserID::new(1),
            title: format!("Transaction {id}"),
            amount: amount.parse().unwrap(),
            kind,
            category: category.to_owned(),
            date,
            notes: None,
            recurring: false,
            payment_method: PaymentMethod::Cash,
        }
    }

    fn budget(amount: &str) -> Budget {
        Budget {
            id: 1,
            owner: UserID::new(1),
            category: "Food".to_owned(),
            amount: amount.parse().unwrap(),
            start_date: date!(2025 - 01 - 01),
            end_date: None,
            notes: None,
        }
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(summarize(&[], &[]), Summary::default());
    }

    #[test]
    fn summary_totals_income_expenses_and_budgets() {
        let transactions = [
            transaction(1, "1000.00", TransactionKind::Income, "Salary", date!(2025 - 05 - 01)),
            transaction(2, "200.00", TransactionKind::Expense, "Food", date!(2025 - 05 - 02)),
        ];

        let got = summarize(&transactions, &[budget("300"), budget("50.25")]);

        assert_eq!(
            got,
            Summary {
                total_income: dec!(1000.00),
                total_expenses: dec!(200.00),
                net_balance: dec!(800.00),
                total_budgeted: dec!(350.25),
            }
        );
    }

    #[test]
    fn net_balance_can_be_negative() {
        let transactions = [
            transaction(1, "10", TransactionKind::Income, "Gift", date!(2025 - 05 - 01)),
            transaction(2, "25.50", TransactionKind::Expense, "Food", date!(2025 - 05 - 02)),
        ];

        assert_eq!(summarize(&transactions, &[]).net_balance, dec!(-15.50));
    }

    #[test]
    fn monthly_totals_cover_window_and_fill_empty_months() {
        let today = date!(2025 - 07 - 15);
        let transactions = [
            transaction(1, "100", TransactionKind::Income, "Salary", date!(2025 - 07 - 01)),
            transaction(2, "40", TransactionKind::Expense, "Food", date!(2025 - 07 - 10)),
            transaction(3, "5", TransactionKind::Expense, "Food", date!(2025 - 03 - 03)),
            // Outside of the window.
            transaction(4, "999", TransactionKind::Expense, "Food", date!(2025 - 01 - 15)),
            transaction(5, "999", TransactionKind::Income, "Salary", date!(2025 - 07 - 16)),
        ];

        let got = monthly_totals(&transactions, today);

        let months = got.iter().map(|total| total.month).collect::<Vec<_>>();
        assert_eq!(
            months,
            vec![
                date!(2025 - 01 - 01),
                date!(2025 - 02 - 01),
                date!(2025 - 03 - 01),
                date!(2025 - 04 - 01),
                date!(2025 - 05 - 01),
                date!(2025 - 06 - 01),
                date!(2025 - 07 - 01),
            ]
        );
        assert_eq!(
            got[0],
            MonthlyTotal {
                month: date!(2025 - 01 - 01),
                income: dec!(0),
                expenses: dec!(0),
            }
        );
        assert_eq!(got[2].expenses, dec!(5));
        assert_eq!(
            got[6],
            MonthlyTotal {
                month: date!(2025 - 07 - 01),
                income: dec!(100),
                expenses: dec!(40),
            }
        );
    }

    #[test]
    fn monthly_totals_cross_year_boundary() {
        let got = monthly_totals(&[], date!(2025 - 02 - 10));

        assert_eq!(got.first().map(|total| total.month), Some(date!(2024 - 08 - 01)));
        assert_eq!(got.last().map(|total| total.month), Some(date!(2025 - 02 - 01)));
        assert_eq!(got.len(), 7);
    }

    #[test]
    fn category_breakdown_orders_by_total_then_name() {
        let day = date!(2025 - 05 - 01);
        let transactions = [
            transaction(1, "30", TransactionKind::Expense, "Transport", day),
            transaction(2, "20", TransactionKind::Expense, "Food", day),
            transaction(3, "25", TransactionKind::Expense, "Food", day),
            transaction(4, "30", TransactionKind::Expense, "Fun", day),
            transaction(5, "500", TransactionKind::Income, "Salary", day),
        ];

        let got = category_breakdown(&transactions, TransactionKind::Expense);

        assert_eq!(
            got,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: dec!(45),
                },
                CategoryTotal {
                    category: "Fun".to_owned(),
                    total: dec!(30),
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    total: dec!(30),
                },
            ]
        );
    }

    #[test]
    fn category_breakdown_of_nothing_is_empty() {
        assert!(category_breakdown(&[], TransactionKind::Income).is_empty());
    }

    #[test]
    fn most_recent_orders_by_date_then_id() {
        let transactions = [
            transaction(1, "1", TransactionKind::Expense, "A", date!(2025 - 05 - 01)),
            transaction(2, "1", TransactionKind::Expense, "A", date!(2025 - 05 - 03)),
            transaction(3, "1", TransactionKind::Expense, "A", date!(2025 - 05 - 01)),
        ];

        let ids = most_recent(&transactions, 2)
            .into_iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![2, 3]);
    }
}
