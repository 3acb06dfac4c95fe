pub mod avatar;
pub mod verification;
