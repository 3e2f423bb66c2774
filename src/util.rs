use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::goal;
use crate::model::{Category, CategoryCount, GoalStatus};

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn category_label(key: &str) -> &str {
    Category::parse(key).map(|category| category.label()).unwrap_or(key)
}

pub fn status_label(key: &str) -> &str {
    GoalStatus::parse(key).map(|status| status.label()).unwrap_or(key)
}

pub fn format_goal_detail(goal: &goal::Model) -> String {
    let mut output = String::new();
    output.push_str(&format!("Goal ID: {}\n", goal.id));
    output.push_str(&format!("Description: {}\n", goal.description));
    output.push_str(&format!(
        "Category: {} ({})\n",
        goal.category,
        category_label(&goal.category)
    ));
    output.push_str(&format!(
        "Status: {} ({})\n",
        goal.status,
        status_label(&goal.status)
    ));
    output.push_str(&format!("Target: {}\n", goal.date));
    output.push_str(&format!("Created: {}\n", format_datetime(goal.created_at)));
    output.push_str(&format!("Updated: {}", format_datetime(goal.updated_at)));
    output
}

pub fn format_category_counts(counts: &[CategoryCount]) -> String {
    if counts.is_empty() {
        return "No goals found.".to_string();
    }
    let width = counts
        .iter()
        .map(|entry| entry.category.as_str().len())
        .max()
        .unwrap_or(0);
    let mut output = String::new();
    for entry in counts {
        output.push_str(&format!(
            "{:<width$}  {}  ({})\n",
            entry.category.as_str(),
            entry.count,
            entry.category.label(),
        ));
    }
    let total: u64 = counts.iter().map(|entry| entry.count).sum();
    output.push_str(&format!("Total: {total}"));
    output
}

/// Serializable view of a stored goal, shared by templates and `--json` output.
#[derive(Clone, Debug, Serialize)]
pub struct GoalView {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub category_label: String,
    pub status: String,
    pub status_label: String,
    pub achieved: bool,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&goal::Model> for GoalView {
    fn from(goal: &goal::Model) -> Self {
        Self {
            id: goal.id,
            description: goal.description.clone(),
            category: goal.category.clone(),
            category_label: category_label(&goal.category).to_string(),
            status: goal.status.clone(),
            status_label: status_label(&goal.status).to_string(),
            achieved: GoalStatus::parse(&goal.status) == Some(GoalStatus::Achieved),
            date: goal.date.clone(),
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}
