pub mod resolve_avatar;
