use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::error::AppError;
use crate::form::{FilterForm, FormErrors, GoalForm};
use crate::model::GoalFilter;
use crate::util::GoalView;
use crate::web::extract::{FormBody, GoalId};
use crate::web::state::AppState;
use crate::web::templates::{MainPage, MAIN};

const INDEX: &str = "/";

pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<FilterForm>,
) -> Result<Html<String>, AppError> {
    let goals = list_views(&state, &filter.to_filter()?).await?;
    let form = GoalForm::default();
    let errors = FormErrors::new();
    state.render(MAIN, &MainPage::new(&form, &errors, &filter, goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Query(filter): Query<FilterForm>,
    FormBody(form): FormBody<GoalForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(input) => {
            state.app.add_goal(input).await?;
            Ok(Redirect::to(INDEX).into_response())
        }
        Err(errors) => {
            let goals = list_views(&state, &filter.to_filter()?).await?;
            let page = state.render(MAIN, &MainPage::new(&form, &errors, &filter, goals))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    GoalId(id): GoalId,
) -> Result<Html<String>, AppError> {
    let goal = state.app.get_goal(id).await?;
    let form = GoalForm::from_model(&goal);
    render_editing(&state, id, &form, &FormErrors::new()).await
}

pub async fn update_goal(
    State(state): State<AppState>,
    GoalId(id): GoalId,
    FormBody(form): FormBody<GoalForm>,
) -> Result<Response, AppError> {
    state.app.get_goal(id).await?;
    match form.validate() {
        Ok(input) => {
            state.app.replace_goal(id, input).await?;
            Ok(Redirect::to(INDEX).into_response())
        }
        Err(errors) => {
            let page = render_editing(&state, id, &form, &errors).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

pub async fn delete_goal(
    State(state): State<AppState>,
    GoalId(id): GoalId,
) -> Result<Redirect, AppError> {
    state.app.delete_goal(id).await?;
    Ok(Redirect::to(INDEX))
}

/// The editing view lists every goal regardless of any active filter.
async fn render_editing(
    state: &AppState,
    id: i64,
    form: &GoalForm,
    errors: &FormErrors,
) -> Result<Html<String>, AppError> {
    let goals = list_views(state, &GoalFilter::default()).await?;
    let filter = FilterForm::default();
    state.render(MAIN, &MainPage::new(form, errors, &filter, goals).editing(id))
}

async fn list_views(state: &AppState, filter: &GoalFilter) -> Result<Vec<GoalView>, AppError> {
    let goals = state.app.list_goals(filter).await?;
    Ok(goals.iter().map(GoalView::from).collect())
}
