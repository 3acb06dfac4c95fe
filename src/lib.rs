// Module layout (Clean Architecture style)
// - bootstrap: configuration and the injected service context
// - domain: core models (acct parsing)
// - application: capability ports and use cases
// - infrastructure: DB/redis/scratch/identicon/supervisor adapters
// - presentation: HTTP/WS handlers, built-in sub-servers
// - server: mount table, listen supervision, streaming attachment

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;
