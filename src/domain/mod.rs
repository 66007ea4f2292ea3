//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Novel Context: 段落、章节、元数据
//! - Translation Context: 翻译结果、显示策略、渲染行

pub mod novel;
pub mod translation;

// 共享的合并引擎
mod merge;

pub use merge::merge;
