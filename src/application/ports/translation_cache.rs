//! Translation Cache Port - 译文缓存
//!
//! 已发布章节的译文视为不可变，成功结果可无限期缓存，
//! 本组件从不失效条目。并发写同一个 key 时后写者胜出。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::novel::Chapter;
use crate::domain::translation::{TranslationResult, TranslatorEngine};

/// Translation Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存 key: (source_key, book_id + sub_ids, chapter_id, engine)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationCacheKey {
    pub source_key: String,
    pub book_key: String,
    pub chapter_id: String,
    pub engine: TranslatorEngine,
}

impl TranslationCacheKey {
    pub fn for_chapter(chapter: &Chapter, engine: TranslatorEngine) -> Self {
        Self {
            source_key: chapter.source_key().to_string(),
            book_key: chapter.book_key(),
            chapter_id: chapter.chapter_id().to_string(),
            engine,
        }
    }
}

impl std::fmt::Display for TranslationCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.source_key, self.book_key, self.chapter_id, self.engine
        )
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Translation Cache Port
#[async_trait]
pub trait TranslationCachePort: Send + Sync {
    async fn get(&self, key: &TranslationCacheKey)
        -> Result<Option<TranslationResult>, CacheError>;

    async fn put(
        &self,
        key: &TranslationCacheKey,
        result: &TranslationResult,
    ) -> Result<(), CacheError>;

    async fn stats(&self) -> CacheStats;
}
