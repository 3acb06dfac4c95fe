pub mod account_repository;
pub mod identicon_renderer;
pub mod profile_repository;
pub mod stream_publisher;
pub mod streaming_handler;
pub mod sub_server;
pub mod supervisor_channel;
