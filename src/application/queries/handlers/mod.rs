//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod chapter_handlers;
mod history_handlers;

pub use chapter_handlers::*;
pub use history_handlers::*;
