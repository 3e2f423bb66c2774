use crate::error::AppError;

pub mod goals;
pub mod graph;

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn not_found() -> AppError {
    AppError::NotFound("page not found".to_string())
}
