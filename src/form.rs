use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::{DATE_MAX_CHARS, DESCRIPTION_MAX_CHARS};
use crate::entities::goal;
use crate::error::AppError;
use crate::model::{Category, GoalFilter, GoalInput, GoalStatus};

const REQUIRED: &str = "This field is required.";
const NOT_A_CHOICE: &str = "Not a valid choice.";
const ALL: &str = "all";

/// Raw values of the new/edit goal form, echoed back on validation failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GoalForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
}

/// Field name -> message.
pub type FormErrors = BTreeMap<&'static str, String>;

impl GoalForm {
    pub fn from_model(model: &goal::Model) -> Self {
        Self {
            description: model.description.clone(),
            category: model.category.clone(),
            status: model.status.clone(),
            date: model.date.clone(),
        }
    }

    pub fn validate(&self) -> Result<GoalInput, FormErrors> {
        let mut errors = FormErrors::new();

        let description = required_text(
            &mut errors,
            "description",
            &self.description,
            DESCRIPTION_MAX_CHARS,
        );
        let date = required_text(&mut errors, "date", &self.date, DATE_MAX_CHARS);
        let category = required_choice(&mut errors, "category", &self.category, Category::parse);
        let status = required_choice(&mut errors, "status", &self.status, GoalStatus::parse);

        match (description, category, status, date) {
            (Some(description), Some(category), Some(status), Some(date)) if errors.is_empty() => {
                Ok(GoalInput {
                    description,
                    category,
                    status,
                    date,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, REQUIRED.to_string());
        return None;
    }
    if value.chars().count() > max {
        errors.insert(field, format!("Field cannot be longer than {max} characters."));
        return None;
    }
    Some(value.to_string())
}

fn required_choice<T>(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    if value.trim().is_empty() {
        errors.insert(field, REQUIRED.to_string());
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        errors.insert(field, NOT_A_CHOICE.to_string());
    }
    parsed
}

/// Query parameters of the list filter. `"all"` or an empty value disables a criterion.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FilterForm {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl FilterForm {
    pub fn to_filter(&self) -> Result<GoalFilter, AppError> {
        let category = match selected(&self.category) {
            Some(value) => Some(Category::parse(value).ok_or_else(|| {
                AppError::InvalidInput(format!("unknown category filter: {value}"))
            })?),
            None => None,
        };
        let status = match selected(&self.status) {
            Some(value) => Some(GoalStatus::parse(value).ok_or_else(|| {
                AppError::InvalidInput(format!("unknown status filter: {value}"))
            })?),
            None => None,
        };
        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string);
        Ok(GoalFilter {
            category,
            status,
            date,
        })
    }

    pub fn category_value(&self) -> &str {
        selected(&self.category).unwrap_or(ALL)
    }

    pub fn status_value(&self) -> &str {
        selected(&self.status).unwrap_or(ALL)
    }

    pub fn date_value(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL)
}
