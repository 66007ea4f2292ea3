//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 分页结果
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 不分页时的总条目数
    pub total: u64,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page_size,
        }
    }

    /// 总页数
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64)
    }
}

// ============================================================================
// Web Novel Repository
// ============================================================================

/// 小说摘要（获取元数据时写入）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NovelSummary {
    /// 组合标识，如 `syosetu-n1234ab`
    pub novel_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub total_chapters: usize,
    pub updated_at: DateTime<Utc>,
}

/// Web Novel Repository Port
#[async_trait]
pub trait WebNovelRepositoryPort: Send + Sync {
    /// 保存或更新摘要
    async fn upsert_summary(&self, summary: &NovelSummary) -> Result<(), RepositoryError>;

    /// 根据组合标识查找摘要
    async fn find_summary(&self, novel_id: &str) -> Result<Option<NovelSummary>, RepositoryError>;
}

// ============================================================================
// Read History Repository
// ============================================================================

/// 阅读记录（每个 user + novel 只保留最近一次）
#[derive(Debug, Clone, PartialEq)]
pub struct ReadHistoryRecord {
    pub user_id: String,
    pub novel_id: String,
    pub chapter_id: String,
    pub read_at: DateTime<Utc>,
}

/// 阅读历史列表条目
#[derive(Debug, Clone, Serialize)]
pub struct ReadHistoryItem {
    pub novel: NovelSummary,
    pub chapter_id: String,
    pub last_read_at: DateTime<Utc>,
}

/// Read History Repository Port
#[async_trait]
pub trait ReadHistoryRepositoryPort: Send + Sync {
    /// 记录最近阅读章节（幂等 upsert，时间戳由服务端生成）
    async fn record_chapter_read(
        &self,
        user_id: &str,
        novel_id: &str,
        chapter_id: &str,
    ) -> Result<(), RepositoryError>;

    /// 查找某本小说的阅读记录
    async fn find(
        &self,
        user_id: &str,
        novel_id: &str,
    ) -> Result<Option<ReadHistoryRecord>, RepositoryError>;

    /// 分页列出阅读历史，按最近阅读时间倒序，page 从 0 开始
    async fn list_read_history(
        &self,
        user_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page<ReadHistoryItem>, RepositoryError>;

    /// 删除单条记录
    async fn delete_read_history_entry(
        &self,
        user_id: &str,
        novel_id: &str,
    ) -> Result<(), RepositoryError>;

    /// 删除用户全部记录
    async fn delete_all_read_history(&self, user_id: &str) -> Result<u64, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let page: Page<()> = Page {
            items: vec![],
            total: 21,
            page_size: 10,
        };
        assert_eq!(page.page_count(), 3);
        assert_eq!(Page::<()>::empty(0).page_count(), 0);
    }
}
