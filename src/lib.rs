pub mod actions;
pub mod client;
pub mod cmd;
pub mod compute;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod traffic;
