//! Translation Context - 翻译限界上下文
//!
//! 职责:
//! - 翻译引擎与翻译结果
//! - 显示策略
//! - 渲染行（合并引擎的输出）

mod entities;
mod errors;
mod policy;
mod value_objects;

pub use entities::{LineKind, RenderedLine, TranslationResult};
pub use errors::TranslationError;
pub use policy::DisplayPolicy;
pub use value_objects::{BlendOpacity, DisplayMode, TranslationSelection, TranslatorEngine};
