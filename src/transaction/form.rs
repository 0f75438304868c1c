//! The form for creating and editing transactions, and its validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, ValidationErrors,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, field_error, loading_spinner,
    },
    money::Money,
    navigation::NavBar,
    transaction::core::{PaymentMethod, Transaction, TransactionKind},
    validation::{
        CATEGORY_MAX_LENGTH, INVALID_CHOICE_MESSAGE, REQUIRED_MESSAGE, max_length_message,
        optional_text, parse_amount, parse_date_or, validate_category,
    },
};

pub const TITLE_MAX_LENGTH: usize = 255;

/// The raw form data for creating or editing a transaction.
///
/// Every field is kept as text so that a bad value is reported next to its
/// field instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub category: String,
    /// A date formatted as YYYY-MM-DD. Blank means today.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
    /// Checkboxes are only submitted when checked.
    #[serde(default)]
    pub recurring: Option<String>,
    /// Blank means cash.
    #[serde(default)]
    pub payment_method: String,
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            title: transaction.title.clone(),
            amount: transaction.amount.to_string(),
            transaction_type: transaction.kind.as_str().to_owned(),
            category: transaction.category.clone(),
            date: transaction.date.to_string(),
            notes: transaction.notes.clone().unwrap_or_default(),
            recurring: transaction.recurring.then(|| "on".to_owned()),
            payment_method: transaction.payment_method.as_str().to_owned(),
        }
    }
}

/// Transaction fields that have passed validation and are ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub title: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub category: String,
    pub date: Date,
    pub notes: Option<String>,
    pub recurring: bool,
    pub payment_method: PaymentMethod,
}

impl ValidatedTransaction {
    /// Validate every field in `form`, using `today` when no date is given.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] with a message for each invalid field.
    pub fn new(form: &TransactionForm, today: Date) -> Result<Self, Error> {
        let mut errors = ValidationErrors::default();

        let title = form.title.trim();
        if title.is_empty() {
            errors.add("title", "Title cannot be empty.");
        } else if title.chars().count() > TITLE_MAX_LENGTH {
            errors.add("title", max_length_message(TITLE_MAX_LENGTH));
        }

        let amount = parse_amount(&form.amount, &mut errors);

        let kind = match form.transaction_type.parse::<TransactionKind>() {
            Ok(kind) => Some(kind),
            Err(_) if form.transaction_type.is_empty() => {
                errors.add("transaction_type", REQUIRED_MESSAGE);
                None
            }
            Err(_) => {
                errors.add("transaction_type", INVALID_CHOICE_MESSAGE);
                None
            }
        };

        let category = validate_category(&form.category, &mut errors);
        let date = parse_date_or(&form.date, today, "date", &mut errors);

        let payment_method = if form.payment_method.is_empty() {
            Some(PaymentMethod::default())
        } else if let Ok(method) = form.payment_method.parse() {
            Some(method)
        } else {
            errors.add("payment_method", INVALID_CHOICE_MESSAGE);
            None
        };

        match (amount, kind, date, payment_method) {
            (Some(amount), Some(kind), Some(date), Some(payment_method)) if errors.is_empty() => {
                Ok(Self {
                    title: title.to_owned(),
                    amount,
                    kind,
                    category,
                    date,
                    notes: optional_text(&form.notes),
                    recurring: form.recurring.is_some(),
                    payment_method,
                })
            }
            _ => Err(Error::Validation(errors)),
        }
    }
}

/// The form inputs for a transaction, prefilled from `form` with any `errors` shown under their field.
pub fn transaction_form_fields(form: &TransactionForm, errors: &ValidationErrors) -> Markup {
    let selected_kind = form.transaction_type.parse::<TransactionKind>().ok();
    let selected_method = form.payment_method.parse::<PaymentMethod>().unwrap_or_default();

    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Enter transaction title"
                value=(form.title)
                maxlength=(TITLE_MAX_LENGTH)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("title")))
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
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

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in TransactionKind::ALL {
                    @let id = format!("transaction-type-{}", kind.as_str().to_lowercase());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="transaction_type"
                            id=(id)
                            type="radio"
                            value=(kind.as_str())
                            checked[selected_kind == Some(kind)]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.as_str()) }
                    }
                }
            }

            (field_error(errors.get("transaction_type")))
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            input
                name="category"
                id="category"
                type="text"
                placeholder="e.g., Food, Rent"
                value=(form.category)
                maxlength=(CATEGORY_MAX_LENGTH)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("category")))
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(form.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("date")))
        }

        div
        {
            label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment method" }

            select
                name="payment_method"
                id="payment_method"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for method in PaymentMethod::ALL {
                    option value=(method.as_str()) selected[method == selected_method]
                    {
                        (method.label())
                    }
                }
            }

            (field_error(errors.get("payment_method")))
        }

        div class="flex items-center gap-3"
        {
            input
                name="recurring"
                id="recurring"
                type="checkbox"
                checked[form.recurring.is_some()]
                class="w-4 h-4 rounded border-gray-300 dark:border-gray-600";

            label for="recurring" class="text-sm font-medium text-gray-900 dark:text-white"
            {
                "Recurring"
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

/// Whether the form creates a new transaction or edits an existing one.
#[derive(Debug, Clone, Copy)]
pub enum FormAction {
    Create,
    Edit(TransactionId),
}

/// The transaction form, swapped in place when the server rejects the input.
pub fn transaction_form(
    action: FormAction,
    form: &TransactionForm,
    errors: &ValidationErrors,
) -> Markup {
    let (hx_post, hx_put, button_text) = match action {
        FormAction::Create => (
            Some(endpoints::TRANSACTIONS_API.to_owned()),
            None,
            "Create Transaction",
        ),
        FormAction::Edit(id) => (
            None,
            Some(format_endpoint(endpoints::TRANSACTION, id)),
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
            (transaction_form_fields(form, errors))

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

/// A full page containing the transaction form.
pub fn transaction_form_page(heading: &str, action: FormAction, form: &TransactionForm) -> Markup {
    let active_endpoint = match action {
        FormAction::Create => endpoints::NEW_TRANSACTION_VIEW,
        FormAction::Edit(_) => endpoints::EDIT_TRANSACTION_VIEW,
    };
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4 w-full" { (heading) }

            (transaction_form(action, form, &ValidationErrors::default()))
        }
    };

    base(heading, &[dollar_input_styles()], &content)
}

/// The response for a rejected form, the form again with a message under each invalid field.
pub fn invalid_form_response(
    action: FormAction,
    form: &TransactionForm,
    errors: &ValidationErrors,
) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        transaction_form(action, form, errors),
    )
        .into_response()
}
