//! Built-in sub-servers. Each one is a self-contained `SubServer` the
//! gateway mounts in a fixed order; none of them knows where it lives.

pub mod api;
pub mod discovery;
pub mod federation;
pub mod files;
pub mod media_proxy;
pub mod web;
pub mod well_known;
