//! Field-level error messages for forms that failed validation.

use std::fmt::Display;

use time::Date;

use crate::money::{AmountError, Money};

/// The longest category name that can be stored.
pub const CATEGORY_MAX_LENGTH: usize = 100;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";
pub const INVALID_CHOICE_MESSAGE: &str = "Select a valid choice.";

/// A message explaining why the value of a single form field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the form field, e.g. "amount".
    pub field: &'static str,
    /// A message suitable for displaying next to the field.
    pub message: String,
}

/// The collected field errors for one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Record an error message for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The first error message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Whether no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded errors in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");

        write!(f, "{messages}")
    }
}

pub fn max_length_message(max_length: usize) -> String {
    format!("Ensure this value has at most {max_length} characters.")
}

/// Parse a positive amount, recording an error for the `amount` field on failure.
pub fn parse_amount(raw_amount: &str, errors: &mut ValidationErrors) -> Option<Money> {
    if raw_amount.trim().is_empty() {
        errors.add("amount", REQUIRED_MESSAGE);
        return None;
    }

    match raw_amount.parse::<Money>() {
        Ok(amount) => Some(amount),
        Err(AmountError::NotPositive) => {
            errors.add("amount", "Amount must be greater than zero.");
            None
        }
        Err(error) => {
            errors.add("amount", error.to_string());
            None
        }
    }
}

/// Trim the category, recording an error for the `category` field if it is blank or too long.
pub fn validate_category(raw_category: &str, errors: &mut ValidationErrors) -> String {
    let category = raw_category.trim();

    if category.is_empty() {
        errors.add("category", REQUIRED_MESSAGE);
    } else if category.chars().count() > CATEGORY_MAX_LENGTH {
        errors.add("category", max_length_message(CATEGORY_MAX_LENGTH));
    }

    category.to_owned()
}

/// Parse a YYYY-MM-DD date, or use `default` if `raw_date` is blank.
pub fn parse_date_or(
    raw_date: &str,
    default: Date,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<Date> {
    let raw_date = raw_date.trim();

    if raw_date.is_empty() {
        return Some(default);
    }

    let date = parse_date(raw_date);
    if date.is_none() {
        errors.add(field, INVALID_DATE_MESSAGE);
    }

    date
}

/// Parse a date in the format used by HTML date inputs, YYYY-MM-DD.
pub fn parse_date(raw_date: &str) -> Option<Date> {
    Date::parse(
        raw_date,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .ok()
}

/// Blank text is stored as absent.
pub fn optional_text(text: &str) -> Option<String> {
    let text = text.trim();

    (!text.is_empty()).then(|| text.to_owned())
}
