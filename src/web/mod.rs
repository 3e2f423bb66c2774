use std::net::SocketAddr;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

mod error;
mod extract;
mod routes;
pub mod state;
pub mod templates;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::goals::index).post(routes::goals::create_goal))
        .route(
            "/edit/{id}",
            get(routes::goals::edit_form).post(routes::goals::update_goal),
        )
        .route(
            "/delete/{id}",
            get(routes::goals::delete_goal).post(routes::goals::delete_goal),
        )
        .route("/graph", get(routes::graph::graph_page))
        .route("/graph.svg", get(routes::graph::graph_image))
        .route("/health", get(routes::health_check))
        .fallback(routes::not_found)
        .layer(from_fn_with_state(state.clone(), error::render_error_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{input, setup_app};
    use crate::app::App;
    use crate::model::{Category, GoalFilter, GoalStatus};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn setup() -> (TempDir, Arc<App>, Router) {
        let (dir, app) = setup_app().await;
        let state = AppState::new(app, templates::load().expect("templates"));
        let app = state.app.clone();
        (dir, app, router(state))
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.expect("response")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header")
    }

    #[tokio::test]
    async fn index_renders_goals() {
        let (_dir, app, router) = setup().await;
        app.add_goal(input("Learn the ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();

        let response = send(&router, get_request("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Learn the ukulele"));
        assert!(html.contains("趣味"));
        assert!(html.contains("未達成"));
    }

    #[tokio::test]
    async fn index_applies_filter_query() {
        let (_dir, app, router) = setup().await;
        app.add_goal(input("Ukulele", Category::Hobby, "2027-01"))
            .await
            .unwrap();
        app.add_goal(input("Promotion", Category::Work, "2026-04"))
            .await
            .unwrap();

        let html = body_text(send(&router, get_request("/?category=work&status=all&date=")).await).await;
        assert!(html.contains("Promotion"));
        assert!(!html.contains("Ukulele"));

        let html = body_text(send(&router, get_request("/?category=all&date=2027")).await).await;
        assert!(html.contains("Ukulele"));
        assert!(!html.contains("Promotion"));
    }

    #[tokio::test]
    async fn index_rejects_unknown_filter_value() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/?category=sports")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_goal_redirects_to_index() {
        let (_dir, app, router) = setup().await;
        let response = send(
            &router,
            form_request(
                "/",
                "description=Read+12+books&category=qol&status=unachieved&date=2026-12",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let goals = app.list_goals(&GoalFilter::default()).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].description, "Read 12 books");
        assert_eq!(goals[0].category, "qol");
    }

    #[tokio::test]
    async fn invalid_create_rerenders_with_errors() {
        let (_dir, app, router) = setup().await;
        let response = send(
            &router,
            form_request("/", "description=Keep+me&category=qol&status=unachieved&date="),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("This field is required."));
        assert!(html.contains(r#"value="Keep me""#));
        assert_eq!(app.count_goals(&GoalFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let (_dir, app, router) = setup().await;
        let goal = app
            .add_goal(input("Ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();
        let response = send(&router, get_request(&format!("/edit/{}", goal.id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(&format!(r#"action="/edit/{}""#, goal.id)));
        assert!(html.contains(r#"value="Ukulele""#));
        assert!(html.contains(r#"<option value="hobby" selected>"#));
    }

    #[tokio::test]
    async fn edit_missing_goal_is_404() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/edit/999")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &router,
            form_request(
                "/edit/999",
                "description=x&category=qol&status=unachieved&date=2026",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn content_type(response: &Response) -> &str {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .expect("content type")
    }

    #[tokio::test]
    async fn non_integer_id_renders_not_found_page() {
        let (_dir, _app, router) = setup().await;
        for request in [
            get_request("/edit/abc"),
            get_request("/delete/abc"),
            form_request("/delete/abc", ""),
            form_request(
                "/edit/abc",
                "description=x&category=qol&status=unachieved&date=2026",
            ),
        ] {
            let response = send(&router, request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert!(content_type(&response).starts_with("text/html"));
            let html = body_text(response).await;
            assert!(html.contains("404 Not Found"));
            assert!(html.contains(r#"href="/graph""#));
        }
    }

    #[tokio::test]
    async fn missing_goal_renders_error_page_inside_layout() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/edit/999")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(content_type(&response).starts_with("text/html"));
        let html = body_text(response).await;
        assert!(html.contains("Not found: goal id 999"));
        assert!(html.contains("目標一覧へ戻る"));
        assert!(html.contains(r#"href="/graph""#));
    }

    #[tokio::test]
    async fn error_page_escapes_message() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/?category=%3Cb%3E")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[tokio::test]
    async fn unreadable_form_body_is_400_page() {
        let (_dir, app, router) = setup().await;
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(content_type(&response).starts_with("text/html"));
        assert_eq!(app.count_goals(&GoalFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_path_renders_not_found_page() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(content_type(&response).starts_with("text/html"));
    }

    #[tokio::test]
    async fn update_goal_overwrites_fields() {
        let (_dir, app, router) = setup().await;
        let goal = app
            .add_goal(input("Ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();
        let response = send(
            &router,
            form_request(
                &format!("/edit/{}", goal.id),
                "description=Banjo&category=skill&status=achieved&date=2028",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let updated = app.get_goal(goal.id).await.unwrap();
        assert_eq!(updated.description, "Banjo");
        assert_eq!(updated.category, Category::Skill.as_str());
        assert_eq!(updated.status, GoalStatus::Achieved.as_str());
        assert_eq!(updated.date, "2028");
    }

    #[tokio::test]
    async fn invalid_update_keeps_stored_goal() {
        let (_dir, app, router) = setup().await;
        let goal = app
            .add_goal(input("Ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();
        let response = send(
            &router,
            form_request(
                &format!("/edit/{}", goal.id),
                "description=&category=hobby&status=achieved&date=2027",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.get_goal(goal.id).await.unwrap().description, "Ukulele");
    }

    #[tokio::test]
    async fn delete_goal_via_get_and_post() {
        let (_dir, app, router) = setup().await;
        let first = app
            .add_goal(input("Ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();
        let second = app
            .add_goal(input("Banjo", Category::Hobby, "2027"))
            .await
            .unwrap();

        let response = send(&router, get_request(&format!("/delete/{}", first.id))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let response = send(&router, form_request(&format!("/delete/{}", second.id), "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.count_goals(&GoalFilter::default()).await.unwrap(), 0);

        let response = send(&router, get_request(&format!("/delete/{}", first.id))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn graph_page_embeds_chart() {
        let (_dir, app, router) = setup().await;
        app.add_goal(input("Ukulele", Category::Hobby, "2027"))
            .await
            .unwrap();
        let response = send(&router, get_request("/graph")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"src="data:image/svg+xml;base64,"#));
        assert!(html.contains("カテゴリ別の目標数"));
    }

    #[tokio::test]
    async fn graph_image_is_svg() {
        let (_dir, app, router) = setup().await;
        app.add_goal(input("Promotion", Category::Work, "2027"))
            .await
            .unwrap();
        let response = send(&router, get_request("/graph.svg")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let svg = body_text(response).await;
        assert!(svg.contains("仕事"));
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let (_dir, _app, router) = setup().await;
        let response = send(&router, get_request("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }
}
