pub mod account_repository_sqlx;
pub mod profile_repository_sqlx;
