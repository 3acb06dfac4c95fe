use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
};

use crate::application::use_cases::avatar::resolve_avatar::{AvatarResolution, ResolveAvatar};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::Acct;

const PLACEHOLDER_PATH: &str = "/static/missing-avatar.png";

#[utoipa::path(
    get,
    path = "/avatar/{acct}",
    tag = "Accounts",
    params(("acct" = String, Path, description = "Account address: @user or @user@host")),
    responses(
        (status = 307, description = "Redirect to the avatar, the account's identicon, or the placeholder"),
        (status = 400, description = "Malformed account address")
    )
)]
pub async fn avatar_redirect(
    State(ctx): State<AppContext>,
    Path(raw): Path<String>,
) -> Result<Redirect, StatusCode> {
    let acct = Acct::parse(&raw).map_err(|_| StatusCode::BAD_REQUEST)?;
    let repo = ctx.account_repo();
    let uc = ResolveAvatar {
        repo: repo.as_ref(),
        own_host: &ctx.cfg.host,
    };
    let resolution = match uc.execute(acct).await {
        Ok(resolution) => resolution,
        Err(err) => {
            // Clients always get a renderable image reference, even with the
            // account store down.
            tracing::error!(error = ?err, "avatar_lookup_failed");
            AvatarResolution::Placeholder
        }
    };
    Ok(match resolution {
        AvatarResolution::Configured(url) => Redirect::temporary(&url),
        AvatarResolution::GeneratedFallback(acct) => {
            let host = acct.host.as_deref().unwrap_or(&ctx.cfg.host);
            let seed = format!("{}@{}", acct.username.to_lowercase(), host);
            Redirect::temporary(&ctx.cfg.absolute_url(&format!("/identicon/{seed}")))
        }
        AvatarResolution::Placeholder => {
            Redirect::temporary(&ctx.cfg.absolute_url(PLACEHOLDER_PATH))
        }
    })
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/avatar/:acct", get(avatar_redirect))
        .with_state(ctx)
}
