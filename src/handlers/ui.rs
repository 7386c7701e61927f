use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Browser form that uploads a PDF to `/analyze` and renders the result as cards.
pub async fn app_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
