//! Read History Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ClearReadHistory, DeleteReadHistoryEntry, ListReadHistory, RecordChapterRead};
use crate::infrastructure::http::dto::{
    ApiResponse, ClearHistoryRequest, ClearHistoryResponse, DeleteHistoryRequest, Empty,
    HistoryPageResponse, ListHistoryRequest, RecordHistoryRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 记录最近阅读章节
pub async fn record_history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordHistoryRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = RecordChapterRead {
        user_id: req.user_id,
        novel_id: req.novel_id,
        chapter_id: req.chapter_id,
    };

    state.record_read_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 分页列出阅读历史
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListHistoryRequest>,
) -> Result<Json<ApiResponse<HistoryPageResponse>>, ApiError> {
    let query = ListReadHistory {
        user_id: req.user_id,
        page: req.page,
        page_size: req.page_size,
    };

    let page = state.list_history_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(page.into())))
}

/// 删除一本小说的阅读记录
pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteHistoryRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteReadHistoryEntry {
        user_id: req.user_id,
        novel_id: req.novel_id,
    };

    state.delete_history_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 清空用户的阅读历史
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClearHistoryRequest>,
) -> Result<Json<ApiResponse<ClearHistoryResponse>>, ApiError> {
    let deleted = state
        .clear_history_handler
        .handle(ClearReadHistory {
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ClearHistoryResponse { deleted })))
}
