//! The form for creating and editing budgets, and its validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, ValidationErrors,
    budget::core::Budget,
    database_id::BudgetId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, field_error, loading_spinner,
    },
    money::Money,
    navigation::NavBar,
    validation::{
        CATEGORY_MAX_LENGTH, INVALID_DATE_MESSAGE, optional_text, parse_amount, parse_date,
        parse_date_or, validate_category,
    },
};

pub const END_BEFORE_START_MESSAGE: &str = "End date must be after start date.";

/// The raw form data for creating or editing a budget.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    /// A date formatted as YYYY-MM-DD. Blank means today.
    #[serde(default)]
    pub start_date: String,
    /// Blank means the budget has no end.
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
}

impl From<&Budget> for BudgetForm {
    fn from(budget: &Budget) -> Self {
        Self {
            category: budget.category.clone(),
            amount: budget.amount.to_string(),
            start_date: budget.start_date.to_string(),
            end_date: budget
                .end_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            notes: budget.notes.clone().unwrap_or_default(),
        }
    }
}

/// Budget fields that have passed validation and are ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBudget {
    pub category: String,
    pub amount: Money,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
}

impl ValidatedBudget {
    /// Validate every field in `form`, starting the budget `today` when no start date is given.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] with a message for each invalid field.
    pub fn new(form: &BudgetForm, today: Date) -> Result<Self, Error> {
        let mut errors = ValidationErrors::default();

        let category = validate_category(&form.category, &mut errors);
        let amount = parse_amount(&form.amount, &mut errors);
        let start_date = parse_date_or(&form.start_date, today, "start_date", &mut errors);

        let end_date = match form.end_date.trim() {
            "" => Some(None),
            raw_date => match parse_date(raw_date) {
                Some(end_date) => Some(Some(end_date)),
                None => {
                    errors.add("end_date", INVALID_DATE_MESSAGE);
                    None
                }
            },
        };

        if let (Some(start_date), Some(Some(end_date))) = (start_date, end_date)
            && end_date < start_date
        {
            errors.add("end_date", END_BEFORE_START_MESSAGE);
        }

        match (amount, start_date, end_date) {
            (Some(amount), Some(start_date), Some(end_date)) if errors.is_empty() => Ok(Self {
                category,
                amount,
                start_date,
                end_date,
                notes: optional_text(&form.notes),
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

fn budget_form_fields(form: &BudgetForm, errors: &ValidationErrors) -> Markup {
    html! {
        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            input
                name="category"
                id="category"
                type="text"
                placeholder="e.g., Groceries"
                value=(form.category)
                maxlength=(CATEGORY_MAX_LENGTH)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("category")))
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    value=(form.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (field_error(errors.get("amount")))
        }

        div class="grid grid-cols-1 gap-4 sm:grid-cols-2"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }

                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=(form.start_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.get("start_date")))
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "End date (optional)" }

                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    value=(form.end_date)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.get("end_date")))
            }
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            textarea
                name="notes"
                id="notes"
                rows="3"
                placeholder="Add notes (optional)"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (form.notes)
            }
        }
    }
}

/// Whether the form creates a new budget or edits an existing one.
#[derive(Debug, Clone, Copy)]
pub enum FormAction {
    Create,
    Edit(BudgetId),
}

pub fn budget_form(action: FormAction, form: &BudgetForm, errors: &ValidationErrors) -> Markup {
    let (hx_post, hx_put, button_text) = match action {
        FormAction::Create => (Some(endpoints::BUDGETS_API.to_owned()), None, "Create Budget"),
        FormAction::Edit(id) => (
            None,
            Some(format_endpoint(endpoints::BUDGET, id)),
            "Save Changes",
        ),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-422="this"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            (budget_form_fields(form, errors))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " " (button_text)
            }
        }
    }
}

/// A full page containing the budget form.
pub fn budget_form_page(heading: &str, action: FormAction, form: &BudgetForm) -> Markup {
    let active_endpoint = match action {
        FormAction::Create => endpoints::NEW_BUDGET_VIEW,
        FormAction::Edit(_) => endpoints::EDIT_BUDGET_VIEW,
    };
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4 w-full" { (heading) }

            (budget_form(action, form, &ValidationErrors::default()))
        }
    };

    base(heading, &[dollar_input_styles()], &content)
}

/// The form again with a message under each invalid field.
pub fn invalid_form_response(
    action: FormAction,
    form: &BudgetForm,
    errors: &ValidationErrors,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        budget_form(action, form, errors),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, ValidationErrors};

    use super::{BudgetForm, ValidatedBudget};

    fn valid_form() -> BudgetForm {
        BudgetForm {
            category: " Groceries ".to_owned(),
            amount: "400".to_owned(),
            start_date: "2025-04-01".to_owned(),
            end_date: "2025-04-30".to_owned(),
            notes: String::new(),
        }
    }

    fn must_get_errors(form: &BudgetForm) -> ValidationErrors {
        match ValidatedBudget::new(form, date!(2025 - 04 - 10)) {
            Err(Error::Validation(errors)) => errors,
            other => panic!("want validation errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_is_cleaned() {
        let got = ValidatedBudget::new(&valid_form(), date!(2025 - 04 - 10)).unwrap();

        assert_eq!(
            got,
            ValidatedBudget {
                category: "Groceries".to_owned(),
                amount: "400".parse().unwrap(),
                start_date: date!(2025 - 04 - 01),
                end_date: Some(date!(2025 - 04 - 30)),
                notes: None,
            }
        );
    }

    #[test]
    fn blank_dates_start_today_without_end() {
        let form = BudgetForm {
            start_date: String::new(),
            end_date: "  ".to_owned(),
            ..valid_form()
        };

        let got = ValidatedBudget::new(&form, date!(2025 - 04 - 10)).unwrap();

        assert_eq!(got.start_date, date!(2025 - 04 - 10));
        assert_eq!(got.end_date, None);
    }

    #[test]
    fn end_date_on_start_date_is_allowed() {
        let form = BudgetForm {
            end_date: "2025-04-01".to_owned(),
            ..valid_form()
        };

        assert!(ValidatedBudget::new(&form, date!(2025 - 04 - 10)).is_ok());
    }

    #[test]
    fn end_date_before_start_date_is_rejected() {
        let form = BudgetForm {
            end_date: "2025-03-31".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            must_get_errors(&form).get("end_date"),
            Some("End date must be after start date.")
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        for amount in ["0", "-1"] {
            let form = BudgetForm {
                amount: amount.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                must_get_errors(&form).get("amount"),
                Some("Amount must be greater than zero.")
            );
        }
    }

    #[test]
    fn invalid_dates_are_rejected() {
        let form = BudgetForm {
            start_date: "yesterday".to_owned(),
            end_date: "2025-13-01".to_owned(),
            ..valid_form()
        };

        let errors = must_get_errors(&form);

        assert_eq!(errors.get("start_date"), Some("Enter a valid date."));
        assert_eq!(errors.get("end_date"), Some("Enter a valid date."));
    }

    #[test]
    fn blank_category_is_rejected() {
        let form = BudgetForm {
            category: String::new(),
            ..valid_form()
        };

        assert_eq!(
            must_get_errors(&form).get("category"),
            Some("This field is required.")
        );
    }
}
