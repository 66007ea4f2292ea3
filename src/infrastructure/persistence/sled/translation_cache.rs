//! Sled-based Translation Cache Implementation

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::application::ports::{CacheError, CacheStats, TranslationCacheKey, TranslationCachePort};
use crate::domain::translation::TranslationResult;

/// Sled 缓存配置
#[derive(Debug, Clone)]
pub struct SledCacheConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledCacheConfig {
    fn default() -> Self {
        Self {
            db_path: "data/translations.sled".to_string(),
        }
    }
}

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InternalCacheEntry {
    result: TranslationResult,
    created_at: i64,
}

/// Sled 译文缓存
///
/// key 为 `md5(source/book/chapter/engine)`，条目从不淘汰
pub struct SledTranslationCache {
    db: Db,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl SledTranslationCache {
    /// 创建新的缓存实例
    pub fn new(config: &SledCacheConfig) -> Result<Self, CacheError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            entries = db.len(),
            "SledTranslationCache initialized"
        );

        Ok(Self {
            db,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    /// 打开现有缓存
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        Self::new(&SledCacheConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn storage_key(key: &TranslationCacheKey) -> String {
        format!("translation:{:x}", md5::compute(key.to_string()))
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TranslationCachePort for SledTranslationCache {
    async fn get(
        &self,
        key: &TranslationCacheKey,
    ) -> Result<Option<TranslationResult>, CacheError> {
        match self.db.get(Self::storage_key(key)) {
            Ok(Some(data)) => {
                let entry: InternalCacheEntry = bincode::deserialize(&data)
                    .map_err(|e| CacheError::SerializationError(e.to_string()))?;
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.result))
            }
            Ok(None) => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => Err(CacheError::DatabaseError(e.to_string())),
        }
    }

    async fn put(
        &self,
        key: &TranslationCacheKey,
        result: &TranslationResult,
    ) -> Result<(), CacheError> {
        let entry = InternalCacheEntry {
            result: result.clone(),
            created_at: Utc::now().timestamp(),
        };
        let entry_bytes =
            bincode::serialize(&entry).map_err(|e| CacheError::SerializationError(e.to_string()))?;

        self.db
            .insert(Self::storage_key(key), entry_bytes)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::debug!(key = %key, "Translation cached");
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.scan_prefix("translation:").count(),
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
    use tempfile::tempdir;

    fn key(engine: TranslatorEngine) -> TranslationCacheKey {
        let chapter = Chapter::new("kakuyomu", "1177", vec![], "100", ["a", "b"]);
        TranslationCacheKey::for_chapter(&chapter, engine)
    }

    #[tokio::test]
    async fn test_cache_put_get() {
        let dir = tempdir().unwrap();
        let cache = SledTranslationCache::open(dir.path().join("test.sled")).unwrap();

        let result = TranslationResult::new(
            TranslatorEngine::Gpt,
            vec![Paragraph::new(0, "甲"), Paragraph::new(1, "乙")],
        );

        // Miss
        assert!(cache.get(&key(TranslatorEngine::Gpt)).await.unwrap().is_none());

        // Put / Get
        cache.put(&key(TranslatorEngine::Gpt), &result).await.unwrap();
        let cached = cache.get(&key(TranslatorEngine::Gpt)).await.unwrap();
        assert_eq!(cached, Some(result));

        // 引擎是 key 的一部分
        assert!(cache.get(&key(TranslatorEngine::Baidu)).await.unwrap().is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 2);
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("persist.sled");
        let result = TranslationResult::new(TranslatorEngine::Youdao, vec![Paragraph::new(0, "丙")]);

        {
            let cache = SledTranslationCache::open(&path).unwrap();
            cache.put(&key(TranslatorEngine::Youdao), &result).await.unwrap();
            cache.flush().unwrap();
        }

        let cache = SledTranslationCache::open(&path).unwrap();
        assert_eq!(
            cache.get(&key(TranslatorEngine::Youdao)).await.unwrap(),
            Some(result)
        );
    }
}
