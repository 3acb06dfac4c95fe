use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
    routing::get,
};

use crate::bootstrap::app_context::AppContext;

#[utoipa::path(
    get,
    path = "/identicon/{seed}",
    tag = "Accounts",
    params(("seed" = String, Path, description = "Any string; the same seed always yields the same image")),
    responses(
        (status = 200, description = "Identicon PNG", content_type = "image/png"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn identicon(
    State(ctx): State<AppContext>,
    Path(seed): Path<String>,
) -> Result<Response, StatusCode> {
    let renderer = ctx.identicon_renderer();
    let png = renderer.render(&seed).await.map_err(|err| {
        tracing::error!(error = ?err, "identicon_render_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_LENGTH, png.len)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from_stream(png.stream))
        .map_err(|err| {
            tracing::error!(error = ?err, "identicon_response_build_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/identicon/:seed", get(identicon))
        .with_state(ctx)
}
