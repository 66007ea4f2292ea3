//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现：来源站点与翻译引擎

pub mod providers;
pub mod translators;

pub use providers::*;
pub use translators::*;
