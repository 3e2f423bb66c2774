use std::sync::Arc;

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::app::App;
use crate::error::AppError;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(app: App, templates: Tera) -> Self {
        Self {
            app: Arc::new(app),
            templates: Arc::new(templates),
        }
    }

    pub fn render<T: Serialize>(&self, name: &str, page: &T) -> Result<Html<String>, AppError> {
        let context = Context::from_serialize(page)?;
        Ok(Html(self.templates.render(name, &context)?))
    }
}
