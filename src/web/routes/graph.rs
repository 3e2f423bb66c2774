use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::chart::{self, CHART_TITLE};
use crate::error::AppError;
use crate::web::state::AppState;
use crate::web::templates::{GraphPage, GRAPH};

pub async fn graph_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let counts = state.app.count_by_category().await?;
    let svg = chart::render_category_chart(&counts)?;
    let page = GraphPage {
        title: CHART_TITLE,
        graph_data: chart::svg_data_uri(&svg),
        total: counts.iter().map(|entry| entry.count).sum(),
    };
    state.render(GRAPH, &page)
}

pub async fn graph_image(State(state): State<AppState>) -> Result<Response, AppError> {
    let counts = state.app.count_by_category().await?;
    let svg = chart::render_category_chart(&counts)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
