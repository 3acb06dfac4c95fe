pub mod http;
pub mod subservers;
pub mod ws;
