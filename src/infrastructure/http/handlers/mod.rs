//! HTTP Handlers

mod history;
mod novel;
mod ping;
mod provider;

pub use history::*;
pub use novel::*;
pub use ping::*;
pub use provider::*;
