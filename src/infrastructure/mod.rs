pub mod db;
pub mod events;
pub mod identicon;
pub mod scratch;
pub mod supervisor;
