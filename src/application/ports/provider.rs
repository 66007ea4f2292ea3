//! Novel Provider Port - 小说来源站点抽象
//!
//! 每个来源站点一个实现，具体实现在 infrastructure/providers 层。
//! Provider 只返回原文与结构化元数据，从不翻译。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::novel::{Chapter, Metadata};

/// Provider 错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 站点不可达或暂时故障，可退避重试
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// 书籍或章节在来源站点不存在
    #[error("Not found: {0}")]
    NotFound(String),

    /// 响应可达但结构不符合预期，说明 Provider 实现已过期
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ProviderError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError(message.into())
    }

    /// 是否可重试
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

/// Novel Provider Port
///
/// book_id 与 sub_ids 由 ProviderRegistry 从组合标识中解析得到
#[async_trait]
pub trait NovelProviderPort: Send + Sync {
    /// 来源标识（组合标识的第一段）
    fn source_key(&self) -> &'static str;

    /// book_id 之后需要的子标识个数
    fn sub_id_arity(&self) -> usize {
        0
    }

    /// 获取小说元数据（标题、作者、简介、目录）
    async fn fetch_metadata(
        &self,
        book_id: &str,
        sub_ids: &[String],
    ) -> Result<Metadata, ProviderError>;

    /// 获取章节原文
    ///
    /// 段落索引从 0 开始连续，顺序与来源一致
    async fn fetch_chapter(
        &self,
        book_id: &str,
        sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError>;
}
