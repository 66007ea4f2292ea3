//! Command Handlers 实现

mod history_handlers;

pub use history_handlers::*;
