use serde::Serialize;
use tera::Tera;

use crate::error::AppError;
use crate::form::{FilterForm, FormErrors, GoalForm};
use crate::model::{Category, GoalStatus};
use crate::util::GoalView;

pub const MAIN: &str = "main.html";
pub const GRAPH: &str = "graph.html";
pub const ERROR: &str = "error.html";

/// Compiles the bundled templates. Names keep the `.html` suffix so tera autoescapes them.
pub fn load() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        (MAIN, include_str!("../../templates/main.html")),
        (GRAPH, include_str!("../../templates/graph.html")),
        (ERROR, include_str!("../../templates/error.html")),
    ])?;
    Ok(tera)
}

#[derive(Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn category_choices() -> Vec<Choice> {
    Category::ALL
        .iter()
        .map(|category| Choice {
            value: category.as_str(),
            label: category.label(),
        })
        .collect()
}

pub fn status_choices() -> Vec<Choice> {
    GoalStatus::ALL
        .iter()
        .map(|status| Choice {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

#[derive(Serialize)]
pub struct FilterValues<'a> {
    pub category: &'a str,
    pub status: &'a str,
    pub date: &'a str,
}

impl<'a> From<&'a FilterForm> for FilterValues<'a> {
    fn from(filter: &'a FilterForm) -> Self {
        Self {
            category: filter.category_value(),
            status: filter.status_value(),
            date: filter.date_value(),
        }
    }
}

/// Context of `main.html`: the goal form, the filter form and the goal table.
#[derive(Serialize)]
pub struct MainPage<'a> {
    pub editing: bool,
    pub editing_id: i64,
    pub form: &'a GoalForm,
    pub errors: &'a FormErrors,
    pub filter: FilterValues<'a>,
    pub goals: Vec<GoalView>,
    pub categories: Vec<Choice>,
    pub statuses: Vec<Choice>,
}

impl<'a> MainPage<'a> {
    pub fn new(
        form: &'a GoalForm,
        errors: &'a FormErrors,
        filter: &'a FilterForm,
        goals: Vec<GoalView>,
    ) -> Self {
        Self {
            editing: false,
            editing_id: 0,
            form,
            errors,
            filter: FilterValues::from(filter),
            goals,
            categories: category_choices(),
            statuses: status_choices(),
        }
    }

    pub fn editing(mut self, id: i64) -> Self {
        self.editing = true;
        self.editing_id = id;
        self
    }
}

#[derive(Serialize)]
pub struct GraphPage<'a> {
    pub title: &'a str,
    pub graph_data: String,
    pub total: u64,
}
