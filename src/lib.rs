pub mod api;
pub mod budget;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod invoker;
pub mod mcp;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod ui;

pub use error::{ChatError, Result};
