//! Cached Provider - 章节原文的内存缓存装饰器
//!
//! 已发布章节极少变动，缓存最近获取的原文以减少对来源站点的请求。
//! 元数据（目录会更新）不缓存。容量满时淘汰最早写入的条目。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::application::ports::{NovelProviderPort, ProviderError};
use crate::domain::novel::{Chapter, Metadata};

struct CachedChapter {
    seq: u64,
    chapter: Chapter,
}

/// 带章节缓存的 Provider
pub struct CachedProvider {
    inner: Arc<dyn NovelProviderPort>,
    chapters: DashMap<String, CachedChapter>,
    capacity: usize,
    seq: AtomicU64,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn NovelProviderPort>, capacity: usize) -> Self {
        Self {
            inner,
            chapters: DashMap::new(),
            capacity,
            seq: AtomicU64::new(0),
        }
    }

    /// capacity 为 0 时不包装
    pub fn wrap(inner: Arc<dyn NovelProviderPort>, capacity: usize) -> Arc<dyn NovelProviderPort> {
        if capacity == 0 {
            inner
        } else {
            Arc::new(Self::new(inner, capacity))
        }
    }

    fn key(book_id: &str, sub_ids: &[String], chapter_id: &str) -> String {
        let mut key = book_id.to_string();
        for sub_id in sub_ids {
            key.push('-');
            key.push_str(sub_id);
        }
        key.push('/');
        key.push_str(chapter_id);
        key
    }

    fn evict_oldest(&self) {
        let oldest = self
            .chapters
            .iter()
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.chapters.remove(&key);
            tracing::debug!(source_key = self.inner.source_key(), key = %key, "Chapter cache evicted");
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[async_trait]
impl NovelProviderPort for CachedProvider {
    fn source_key(&self) -> &'static str {
        self.inner.source_key()
    }

    fn sub_id_arity(&self) -> usize {
        self.inner.sub_id_arity()
    }

    async fn fetch_metadata(
        &self,
        book_id: &str,
        sub_ids: &[String],
    ) -> Result<Metadata, ProviderError> {
        self.inner.fetch_metadata(book_id, sub_ids).await
    }

    async fn fetch_chapter(
        &self,
        book_id: &str,
        sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError> {
        let key = Self::key(book_id, sub_ids, chapter_id);
        if let Some(entry) = self.chapters.get(&key) {
            tracing::debug!(source_key = self.source_key(), key = %key, "Chapter cache hit");
            return Ok(entry.chapter.clone());
        }

        let chapter = self.inner.fetch_chapter(book_id, sub_ids, chapter_id).await?;

        while self.chapters.len() >= self.capacity.max(1) {
            self.evict_oldest();
        }
        self.chapters.insert(
            key,
            CachedChapter {
                seq: self.seq.fetch_add(1, Ordering::Relaxed),
                chapter: chapter.clone(),
            },
        );

        Ok(chapter)
    }
}
