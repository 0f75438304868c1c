//! Budgets: spending limits that users set for a category over a period of time.

mod budgets_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use budgets_page::get_budgets_page;
pub use core::{Budget, create_budget_table, get_budgets_by_owner};
pub use create_endpoint::create_budget_endpoint;
pub use create_page::get_create_budget_page;
pub use delete_endpoint::delete_budget_endpoint;
pub use edit_endpoint::edit_budget_endpoint;
pub use edit_page::get_edit_budget_page;
pub use form::ValidatedBudget;

#[cfg(test)]
pub use core::{count_budgets, create_budget, delete_budget, get_budget, update_budget};
