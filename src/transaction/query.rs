//! Filtering and sorting for the transactions page.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    transaction::{Transaction, TransactionKind},
    validation::parse_date,
};

/// The query string of the transactions page as sent by the browser.
///
/// Every parameter is optional. Blank or unrecognised values are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TransactionQueryParams {
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
}

/// The orders the transactions page can be sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    DateAscending,
    DateDescending,
    AmountAscending,
    AmountDescending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::DateDescending,
        SortOrder::DateAscending,
        SortOrder::AmountDescending,
        SortOrder::AmountAscending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::DateAscending => "date_asc",
            SortOrder::DateDescending => "date_desc",
            SortOrder::AmountAscending => "amount_asc",
            SortOrder::AmountDescending => "amount_desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::DateAscending => "Date (oldest first)",
            SortOrder::DateDescending => "Date (newest first)",
            SortOrder::AmountAscending => "Amount (lowest first)",
            SortOrder::AmountDescending => "Amount (highest first)",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == text)
    }
}

/// The parsed filters and sort order for a list of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
    /// Lower case text that the category must contain.
    pub category: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub sort: Option<SortOrder>,
}

impl From<&TransactionQueryParams> for TransactionQuery {
    fn from(params: &TransactionQueryParams) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        Self {
            kind: non_blank(&params.transaction_type).and_then(|kind| kind.parse().ok()),
            category: non_blank(&params.category).map(|category| category.to_lowercase()),
            from: non_blank(&params.start_date).and_then(|date| parse_date(&date)),
            to: non_blank(&params.end_date).and_then(|date| parse_date(&date)),
            sort: non_blank(&params.sort_by).and_then(|order| SortOrder::parse(&order)),
        }
    }
}

impl TransactionQuery {
    fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self.category.as_deref().is_none_or(|category| {
                transaction.category.to_lowercase().contains(category)
            })
            && self.from.is_none_or(|from| transaction.date >= from)
            && self.to.is_none_or(|to| transaction.date <= to)
    }

    /// Keep the transactions that match every filter, then sort them.
    ///
    /// Without a sort order the input order is kept. Sorting is stable, so
    /// transactions with equal keys stay in their input order.
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        let mut transactions = transactions
            .into_iter()
            .filter(|transaction| self.matches(transaction))
            .collect::<Vec<_>>();

        match self.sort {
            Some(SortOrder::DateAscending) => transactions.sort_by_key(|t| t.date),
            Some(SortOrder::DateDescending) => {
                transactions.sort_by(|a, b| b.date.cmp(&a.date));
            }
            Some(SortOrder::AmountAscending) => transactions.sort_by_key(|t| t.amount),
            Some(SortOrder::AmountDescending) => {
                transactions.sort_by(|a, b| b.amount.cmp(&a.amount));
            }
            None => {}
        }

        transactions
    }
}
