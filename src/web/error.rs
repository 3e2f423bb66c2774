use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde::Serialize;

use crate::error::AppError;
use crate::web::state::AppState;
use crate::web::templates::ERROR;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_)
            | AppError::Db(_)
            | AppError::Json(_)
            | AppError::Template(_)
            | AppError::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Marks a response as an error so `render_error_page` can replace its body.
#[derive(Clone, Debug)]
pub struct ErrorMessage(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
            self.to_string()
        };
        (status, Extension(ErrorMessage(message.clone())), message).into_response()
    }
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    status: String,
    message: &'a str,
}

/// Renders `error.html` for responses produced from an `AppError`.
pub async fn render_error_page(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorMessage(message)) = response.extensions_mut().remove::<ErrorMessage>() else {
        return response;
    };
    let status = response.status();
    let page = ErrorPage {
        status: status.to_string(),
        message: &message,
    };
    match state.render(ERROR, &page) {
        Ok(html) => (status, html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render error page");
            (status, message).into_response()
        }
    }
}
