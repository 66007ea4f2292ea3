//! Novel Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetMetadata, RenderChapter};
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterRequest, ChapterResponse, MetadataRequest, NovelMetadataResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取作品元数据（标题、作者、简介、目录）
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MetadataRequest>,
) -> Result<Json<ApiResponse<NovelMetadataResponse>>, ApiError> {
    let query = GetMetadata {
        novel_id: req.novel_id,
    };

    let result = state.get_metadata_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 获取按显示策略合并后的章节
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let query = RenderChapter {
        novel_id: req.novel_id,
        chapter_id: req.chapter_id,
        policy: req.policy,
        user_id: req.user_id,
    };

    let result = state.render_chapter_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(result.into())))
}
