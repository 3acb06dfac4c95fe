use axum::Router;
use tower_http::services::ServeDir;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// Serves uploaded files straight off disk. Deployments with object
/// storage replace this with their own drive service.
pub struct FilesServer;

impl SubServer for FilesServer {
    fn name(&self) -> &'static str {
        "files"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new().fallback_service(ServeDir::new(&ctx.cfg.files_dir)))
    }
}
