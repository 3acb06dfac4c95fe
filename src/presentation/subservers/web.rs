use axum::{Router, response::Html};
use htmlescape::encode_minimal as escape_html;
use tower_http::services::ServeDir;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;

/// The catch-all front end: static assets under `/static`, and the client
/// boot shell for every path no other sub-server claimed. Client-side
/// routing takes it from there, so the shell always answers 200.
pub struct WebServer;

impl SubServer for WebServer {
    fn name(&self) -> &'static str {
        "web"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        let shell = render_shell(&ctx.cfg);
        Ok(Router::new()
            .nest_service("/static", ServeDir::new(&ctx.cfg.assets_dir))
            .fallback(move || {
                let shell = shell.clone();
                async move { Html(shell) }
            }))
    }
}

fn render_shell(cfg: &Config) -> String {
    let name = escape_html(&cfg.instance_name);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>{name}</title>\n\
         <link rel=\"stylesheet\" href=\"/static/app.css\" />\n</head>\n<body>\n\
         <div id=\"app\" data-instance=\"{name}\"></div>\n\
         <script src=\"/static/app.js\"></script>\n</body>\n</html>\n"
    )
}
