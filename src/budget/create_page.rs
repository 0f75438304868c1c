use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    budget::form::{BudgetForm, FormAction, budget_form_page},
    timezone::get_local_today,
};

#[derive(Debug, Clone)]
pub struct CreateBudgetPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a budget that starts today.
pub async fn get_create_budget_page(
    State(state): State<CreateBudgetPageState>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let form = BudgetForm {
        start_date: today.to_string(),
        ..Default::default()
    };

    Ok(budget_form_page("New Budget", FormAction::Create, &form).into_response())
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
        timezone::get_local_today,
    };

    use super::{CreateBudgetPageState, get_create_budget_page};

    #[tokio::test]
    async fn render_page() {
        let state = CreateBudgetPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_create_budget_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::BUDGETS_API, "hx-post");
        assert_form_input(&form, "category", "text");
        assert_form_input(&form, "amount", "text");
        assert_form_input(&form, "start_date", "date");
        assert_form_input_with_value(
            &form,
            "start_date",
            &get_local_today("Etc/UTC").unwrap().to_string(),
        );
        assert_form_input_with_value(&form, "end_date", "");
        assert_form_submit_button_with_text(&form, "Create Budget");
    }
}
