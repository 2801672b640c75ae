use axum::response::Html;

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

/// GET /
///
/// Landing page with the waitlist form. The inline script posts to
/// `/api/waitlist` with the same checks as [`crate::form::SignupForm`].
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
