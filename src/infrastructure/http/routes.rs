//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                GET   健康检查
//! - /api/provider/list       GET   已注册的来源站点
//! - /api/translator/list     GET   已配置的翻译引擎
//! - /api/novel/metadata      POST  作品元数据
//! - /api/novel/chapter       POST  按显示策略合并后的章节
//! - /api/history/record      POST  记录阅读进度
//! - /api/history/list        POST  分页列出阅读历史
//! - /api/history/delete      POST  删除一条阅读记录
//! - /api/history/clear       POST  清空阅读历史

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/provider/list", get(handlers::list_providers))
        .route("/translator/list", get(handlers::list_translators))
        .nest("/novel", novel_routes())
        .nest("/history", history_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/metadata", post(handlers::get_metadata))
        .route("/chapter", post(handlers::get_chapter))
}

/// History 路由
fn history_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/record", post(handlers::record_history))
        .route("/list", post(handlers::list_history))
        .route("/delete", post(handlers::delete_history))
        .route("/clear", post(handlers::clear_history))
}
