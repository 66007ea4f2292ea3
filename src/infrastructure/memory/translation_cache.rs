//! In-Memory Translation Cache Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::application::ports::{CacheError, CacheStats, TranslationCacheKey, TranslationCachePort};
use crate::domain::translation::TranslationResult;

/// 内存译文缓存（进程退出即丢失）
#[derive(Default)]
pub struct InMemoryTranslationCache {
    entries: DashMap<TranslationCacheKey, TranslationResult>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl InMemoryTranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TranslationCachePort for InMemoryTranslationCache {
    async fn get(
        &self,
        key: &TranslationCacheKey,
    ) -> Result<Option<TranslationResult>, CacheError> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.value().clone()))
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        key: &TranslationCacheKey,
        result: &TranslationResult,
    ) -> Result<(), CacheError> {
        self.entries.insert(key.clone(), result.clone());
        tracing::debug!(key = %key, "Translation cached in memory");
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::{Chapter, Paragraph};
    use crate::domain::translation::TranslatorEngine;

    #[tokio::test]
    async fn test_put_get_and_stats() {
        let cache = InMemoryTranslationCache::new();
        let chapter = Chapter::new("syosetu", "n1", vec![], "1", ["a"]);
        let key = TranslationCacheKey::for_chapter(&chapter, TranslatorEngine::Youdao);

        assert!(cache.get(&key).await.unwrap().is_none());

        let result = TranslationResult::new(TranslatorEngine::Youdao, vec![Paragraph::new(0, "甲")]);
        cache.put(&key, &result).await.unwrap();

        let cached = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(cached.paragraph_at(0).unwrap().text(), "甲");

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }
}
