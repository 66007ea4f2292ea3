//! Chapter Query Handlers

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelSummary, ReadHistoryRepositoryPort, WebNovelRepositoryPort};
use crate::application::queries::{GetMetadata, RenderChapter};
use crate::application::services::{
    EngineFailure, FetchOutcome, ProviderRegistry, TranslationFetcher,
};
use crate::domain::merge;
use crate::domain::novel::{Chapter, Metadata};
use crate::domain::translation::{RenderedLine, TranslatorEngine};

// ============================================================================
// Response DTOs
// ============================================================================

/// 渲染后的章节
#[derive(Debug, Clone)]
pub struct RenderedChapterResponse {
    pub novel_id: String,
    pub chapter_id: String,
    pub title: Option<String>,
    pub lines: Vec<RenderedLine>,
    pub failures: Vec<EngineFailure>,
    pub blend_opacity_hint: f32,
}

/// 元数据响应
#[derive(Debug, Clone)]
pub struct MetadataResponse {
    pub novel_id: String,
    pub metadata: Metadata,
}

// ============================================================================
// RenderChapter
// ============================================================================

/// RenderChapter Handler
///
/// 原文获取失败直接报错；译文失败只减少可用引擎
pub struct RenderChapterHandler {
    registry: Arc<ProviderRegistry>,
    fetcher: Arc<TranslationFetcher>,
    history_repo: Arc<dyn ReadHistoryRepositoryPort>,
    /// 整个请求等待译文的最长时间
    deadline: Duration,
}

impl RenderChapterHandler {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        fetcher: Arc<TranslationFetcher>,
        history_repo: Arc<dyn ReadHistoryRepositoryPort>,
        deadline: Duration,
    ) -> Self {
        Self {
            registry,
            fetcher,
            history_repo,
            deadline,
        }
    }

    pub async fn handle(
        &self,
        query: RenderChapter,
    ) -> Result<RenderedChapterResponse, ApplicationError> {
        let chapter_id = query.chapter_id.trim();
        if chapter_id.is_empty() {
            return Err(ApplicationError::validation("chapter_id must not be empty"));
        }

        let resolved = self.registry.resolve(&query.novel_id)?;
        let novel_id = resolved.novel_id();

        let chapter = resolved
            .provider
            .fetch_chapter(&resolved.book_id, &resolved.sub_ids, chapter_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    novel_id = %novel_id,
                    chapter_id = %chapter_id,
                    error = %e,
                    "Failed to fetch original chapter"
                );
                ApplicationError::from(e)
            })?;
        let chapter = Arc::new(chapter);

        let engines = query.policy.requested_engines();
        let outcome = if engines.is_empty() {
            FetchOutcome::default()
        } else {
            self.fetch_translations(chapter.clone(), engines).await
        };

        let lines = merge(&chapter, &outcome.results, &query.policy);

        if let Some(user_id) = query.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            if let Err(e) = self
                .history_repo
                .record_chapter_read(user_id, &novel_id, chapter.chapter_id())
                .await
            {
                tracing::warn!(
                    user_id = %user_id,
                    novel_id = %novel_id,
                    error = %e,
                    "Failed to record read history"
                );
            }
        }

        tracing::info!(
            novel_id = %novel_id,
            chapter_id = %chapter_id,
            paragraphs = chapter.paragraph_count(),
            lines = lines.len(),
            translated_by = outcome.results.len(),
            failed = outcome.failures.len(),
            "Chapter rendered"
        );

        Ok(RenderedChapterResponse {
            novel_id,
            chapter_id: chapter.chapter_id().to_string(),
            title: chapter.title().map(str::to_string),
            lines,
            failures: outcome.failures,
            blend_opacity_hint: query.policy.blend_opacity_hint(),
        })
    }

    /// 并发取译文
    ///
    /// handler future 被丢弃（客户端断开）或超过 deadline 时取消进行中的请求
    async fn fetch_translations(
        &self,
        chapter: Arc<Chapter>,
        engines: &[TranslatorEngine],
    ) -> FetchOutcome {
        let cancel = CancellationToken::new();
        let _guard = cancel.clone().drop_guard();

        let fetch = self.fetcher.fetch_all(chapter, engines, cancel.clone());
        tokio::pin!(fetch);

        tokio::select! {
            outcome = &mut fetch => outcome,
            _ = tokio::time::sleep(self.deadline) => {
                tracing::warn!(
                    deadline_secs = self.deadline.as_secs(),
                    "Translation deadline elapsed, cancelling pending engines"
                );
                cancel.cancel();
                fetch.await
            }
        }
    }
}

// ============================================================================
// GetMetadata
// ============================================================================

/// GetMetadata Handler
///
/// 成功获取后顺带更新小说摘要，供阅读历史列表使用
pub struct GetMetadataHandler {
    registry: Arc<ProviderRegistry>,
    novel_repo: Arc<dyn WebNovelRepositoryPort>,
}

impl GetMetadataHandler {
    pub fn new(registry: Arc<ProviderRegistry>, novel_repo: Arc<dyn WebNovelRepositoryPort>) -> Self {
        Self {
            registry,
            novel_repo,
        }
    }

    pub async fn handle(&self, query: GetMetadata) -> Result<MetadataResponse, ApplicationError> {
        let resolved = self.registry.resolve(&query.novel_id)?;
        let novel_id = resolved.novel_id();

        let metadata = resolved
            .provider
            .fetch_metadata(&resolved.book_id, &resolved.sub_ids)
            .await?;

        let summary = NovelSummary {
            novel_id: novel_id.clone(),
            title: metadata.title.clone(),
            authors: metadata.authors.iter().map(|a| a.name.clone()).collect(),
            total_chapters: metadata.chapter_count(),
            updated_at: Utc::now(),
        };
        if let Err(e) = self.novel_repo.upsert_summary(&summary).await {
            tracing::warn!(novel_id = %novel_id, error = %e, "Failed to save novel summary");
        }

        tracing::info!(
            novel_id = %novel_id,
            title = %metadata.title,
            chapters = summary.total_chapters,
            "Metadata fetched"
        );

        Ok(MetadataResponse { novel_id, metadata })
    }
}
