//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 段落与章节（按索引对齐的基础模型）
//! - 小说元数据与目录

mod entities;

pub use entities::{Author, Chapter, Metadata, Paragraph, TocItem};
