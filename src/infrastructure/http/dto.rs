//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{
    EngineFailure, MetadataResponse, NovelSummary, Page, ReadHistoryItem,
    RenderedChapterResponse,
};
use crate::domain::novel::{Author, TocItem};
use crate::domain::translation::{DisplayPolicy, RenderedLine};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Provider DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub source_key: &'static str,
    /// novel_id 中 book_id 之后的子标识个数
    pub sub_id_arity: usize,
}

// ============================================================================
// Novel DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub novel_id: String,
}

#[derive(Debug, Serialize)]
pub struct NovelMetadataResponse {
    pub novel_id: String,
    pub title: String,
    pub authors: Vec<Author>,
    pub introduction: String,
    pub toc: Vec<TocItem>,
}

impl From<MetadataResponse> for NovelMetadataResponse {
    fn from(r: MetadataResponse) -> Self {
        Self {
            novel_id: r.novel_id,
            title: r.metadata.title,
            authors: r.metadata.authors,
            introduction: r.metadata.introduction,
            toc: r.metadata.toc,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChapterRequest {
    pub novel_id: String,
    pub chapter_id: String,
    #[serde(default)]
    pub policy: DisplayPolicy,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub novel_id: String,
    pub chapter_id: String,
    pub title: Option<String>,
    pub lines: Vec<RenderedLine>,
    /// 本次未能提供译文的引擎
    pub failures: Vec<EngineFailure>,
    pub blend_opacity_hint: f32,
}

impl From<RenderedChapterResponse> for ChapterResponse {
    fn from(r: RenderedChapterResponse) -> Self {
        Self {
            novel_id: r.novel_id,
            chapter_id: r.chapter_id,
            title: r.title,
            lines: r.lines,
            failures: r.failures,
            blend_opacity_hint: r.blend_opacity_hint,
        }
    }
}

// ============================================================================
// History DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RecordHistoryRequest {
    pub user_id: String,
    pub novel_id: String,
    pub chapter_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListHistoryRequest {
    pub user_id: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct DeleteHistoryRequest {
    pub user_id: String,
    pub novel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearHistoryRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryItemResponse {
    pub novel_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub total_chapters: usize,
    pub chapter_id: String,
    pub last_read_at: DateTime<Utc>,
}

impl From<ReadHistoryItem> for HistoryItemResponse {
    fn from(item: ReadHistoryItem) -> Self {
        let NovelSummary {
            novel_id,
            title,
            authors,
            total_chapters,
            ..
        } = item.novel;
        Self {
            novel_id,
            title,
            authors,
            total_chapters,
            chapter_id: item.chapter_id,
            last_read_at: item.last_read_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryPageResponse {
    pub items: Vec<HistoryItemResponse>,
    pub total: u64,
    pub page_count: u64,
}

impl From<Page<ReadHistoryItem>> for HistoryPageResponse {
    fn from(page: Page<ReadHistoryItem>) -> Self {
        let page_count = page.page_count();
        Self {
            items: page.items.into_iter().map(HistoryItemResponse::from).collect(),
            total: page.total,
            page_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub deleted: u64,
}
