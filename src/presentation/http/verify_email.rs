use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::application::use_cases::verification::redeem_code::{RedeemOutcome, RedeemVerifyCode};
use crate::bootstrap::app_context::AppContext;

const CONFIRMATION_BODY: &str = "Email address verified.";

#[utoipa::path(
    get,
    path = "/verify-email/{code}",
    tag = "Accounts",
    params(("code" = String, Path, description = "One-time verification code, matched exactly")),
    responses(
        (status = 200, description = "Code redeemed; the profile is now verified"),
        (status = 404, description = "Unknown or already redeemed code")
    )
)]
pub async fn verify_email(
    State(ctx): State<AppContext>,
    Path(code): Path<String>,
) -> Result<&'static str, StatusCode> {
    let profiles = ctx.profile_repo();
    let events = ctx.stream_publisher();
    let uc = RedeemVerifyCode {
        profiles: profiles.as_ref(),
        events: events.as_ref(),
    };
    match uc.execute(&code).await {
        Ok(RedeemOutcome::Verified) => Ok(CONFIRMATION_BODY),
        Ok(RedeemOutcome::UnknownCode) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = ?err, "verify_email_failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/verify-email/:code", get(verify_email))
        .with_state(ctx)
}
