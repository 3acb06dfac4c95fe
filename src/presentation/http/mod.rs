pub mod avatar;
pub mod docs;
pub mod identicon;
pub mod verify_email;

use axum::Router;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// The endpoints the gateway owns itself: account-derived images, email
/// verification, and the API document. Mounted at the root after the
/// protocol handlers, before the web shell takes the rest.
pub struct GatewayEndpoints;

impl SubServer for GatewayEndpoints {
    fn name(&self) -> &'static str {
        "gateway-endpoints"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new()
            .merge(avatar::routes(ctx.clone()))
            .merge(identicon::routes(ctx.clone()))
            .merge(verify_email::routes(ctx.clone()))
            .merge(docs::routes()))
    }
}
