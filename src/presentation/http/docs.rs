use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::avatar::avatar_redirect,
        crate::presentation::http::identicon::identicon,
        crate::presentation::http::verify_email::verify_email,
        crate::presentation::subservers::api::ping,
    ),
    tags(
        (name = "Accounts", description = "Account-derived images and email verification"),
        (name = "System", description = "Instance liveness and metadata")
    )
)]
pub struct ApiDoc;

/// Machine-readable description of the endpoints the gateway itself owns.
/// Mounted sub-servers document their own surfaces.
pub async fn api_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn routes() -> Router {
    Router::new().route("/api-doc", get(api_doc))
}
