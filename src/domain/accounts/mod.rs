pub mod account;
pub mod acct;

pub use account::{Account, AccountSnapshot};
pub use acct::Acct;
