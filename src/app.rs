use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};

use crate::entities::goal;
use crate::error::AppError;
use crate::model::{Category, CategoryCount, GoalChanges, GoalFilter, GoalInput, GoalStatus};

pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const DATE_MAX_CHARS: usize = 50;

pub struct App {
    db: DatabaseConnection,
}

impl App {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn add_goal(&self, input: GoalInput) -> Result<goal::Model, AppError> {
        ensure_description(&input.description)?;
        ensure_date(&input.date)?;
        let now = Utc::now();
        let active = goal::ActiveModel {
            description: Set(input.description.trim().to_string()),
            category: Set(input.category.as_str().to_string()),
            status: Set(input.status.as_str().to_string()),
            date: Set(input.date.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let insert = goal::Entity::insert(active).exec(&self.db).await?;
        let created = goal::Entity::find_by_id(insert.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("goal not found after insert".to_string()))?;
        tracing::info!(goal_id = created.id, category = %created.category, "goal created");
        Ok(created)
    }

    pub async fn get_goal(&self, id: i64) -> Result<goal::Model, AppError> {
        goal::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal id {id}")))
    }

    pub async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<goal::Model>, AppError> {
        Ok(filtered(filter)
            .order_by_asc(goal::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn count_goals(&self, filter: &GoalFilter) -> Result<u64, AppError> {
        Ok(filtered(filter).count(&self.db).await?)
    }

    /// Overwrites every field, as the edit form does.
    pub async fn replace_goal(&self, id: i64, input: GoalInput) -> Result<goal::Model, AppError> {
        self.update_goal(id, GoalChanges::from(input)).await
    }

    pub async fn update_goal(
        &self,
        id: i64,
        changes: GoalChanges,
    ) -> Result<goal::Model, AppError> {
        if changes.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        if let Some(description) = changes.description.as_deref() {
            ensure_description(description)?;
        }
        if let Some(date) = changes.date.as_deref() {
            ensure_date(date)?;
        }

        let mut active = goal::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(description) = changes.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(category) = changes.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(date) = changes.date {
            active.date = Set(date.trim().to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = match active.update(&self.db).await {
            Ok(model) => model,
            Err(sea_orm::DbErr::RecordNotFound(_)) | Err(sea_orm::DbErr::RecordNotUpdated) => {
                return Err(AppError::NotFound(format!("goal id {id}")))
            }
            Err(err) => return Err(err.into()),
        };
        tracing::info!(goal_id = model.id, "goal updated");
        Ok(model)
    }

    pub async fn delete_goal(&self, id: i64) -> Result<(), AppError> {
        let goal = self.get_goal(id).await?;
        goal.delete(&self.db).await?;
        tracing::info!(goal_id = id, "goal deleted");
        Ok(())
    }

    pub async fn delete_goals(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let unique = unique_ids(ids);

        let txn = self.db.begin().await?;
        let result: Result<u64, AppError> = async {
            ensure_goals_exist(&txn, &unique).await?;
            let result = goal::Entity::delete_many()
                .filter(goal::Column::Id.is_in(unique.clone()))
                .exec(&txn)
                .await?;
            Ok(result.rows_affected)
        }
        .await;

        let deleted = finalize_transaction(txn, result).await?;
        tracing::info!(count = deleted, "goals deleted");
        Ok(deleted)
    }

    /// Marks every id achieved, or none of them if any id is missing.
    pub async fn mark_achieved(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let unique = unique_ids(ids);

        let txn = self.db.begin().await?;
        let result: Result<u64, AppError> = async {
            ensure_goals_exist(&txn, &unique).await?;
            let result = goal::Entity::update_many()
                .col_expr(
                    goal::Column::Status,
                    Expr::value(GoalStatus::Achieved.as_str()),
                )
                .col_expr(goal::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(goal::Column::Id.is_in(unique.clone()))
                .exec(&txn)
                .await?;
            Ok(result.rows_affected)
        }
        .await;

        let updated = finalize_transaction(txn, result).await?;
        tracing::info!(count = updated, "goals achieved");
        Ok(updated)
    }

    /// Categories without goals are omitted; the rest follow `Category::ALL` order.
    pub async fn count_by_category(&self) -> Result<Vec<CategoryCount>, AppError> {
        let rows: Vec<(String, i64)> = goal::Entity::find()
            .select_only()
            .column(goal::Column::Category)
            .column_as(Expr::col(goal::Column::Id).count(), "count")
            .group_by(goal::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await?;

        // Rows written with display labels share a category with their key rows.
        let mut merged: HashMap<Category, u64> = HashMap::new();
        for (category, count) in rows {
            match Category::parse(&category) {
                Some(category) => *merged.entry(category).or_default() += count.max(0) as u64,
                None => tracing::warn!(%category, count, "skipping unknown category"),
            }
        }
        let mut counts: Vec<CategoryCount> = merged
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        counts.sort_by_key(|entry| entry.category.position());
        Ok(counts)
    }
}

fn filtered(filter: &GoalFilter) -> Select<goal::Entity> {
    let mut select = goal::Entity::find();
    if let Some(category) = filter.category {
        select = select
            .filter(goal::Column::Category.is_in([category.as_str(), category.label()]));
    }
    if let Some(status) = filter.status {
        select =
            select.filter(goal::Column::Status.is_in([status.as_str(), status.label()]));
    }
    if let Some(date) = filter.date.as_deref().filter(|date| !date.is_empty()) {
        select = select.filter(goal::Column::Date.contains(date));
    }
    select
}

async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                return Err(rollback_err.into());
            }
            Err(err)
        }
    }
}

async fn ensure_goals_exist(txn: &DatabaseTransaction, ids: &[i64]) -> Result<(), AppError> {
    let existing = goal::Entity::find()
        .filter(goal::Column::Id.is_in(ids.to_vec()))
        .all(txn)
        .await?;
    let existing_ids: HashSet<i64> = existing.iter().map(|goal| goal.id).collect();
    let missing: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| !existing_ids.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(format!(
            "goal id(s) not found: {}",
            join_ids(&missing)
        )));
    }
    Ok(())
}

fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for id in ids {
        if seen.insert(*id) {
            unique.push(*id);
        }
    }
    unique
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn ensure_description(value: &str) -> Result<(), AppError> {
    ensure_non_empty("description", value)?;
    ensure_max_chars("description", value, DESCRIPTION_MAX_CHARS)
}

fn ensure_date(value: &str) -> Result<(), AppError> {
    ensure_non_empty("date", value)?;
    ensure_max_chars("date", value, DATE_MAX_CHARS)
}

fn ensure_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty")));
    }
    Ok(())
}

fn ensure_max_chars(label: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().chars().count() > max {
        return Err(AppError::InvalidInput(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}
