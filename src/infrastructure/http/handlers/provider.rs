//! Provider / Translator Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::translation::TranslatorEngine;
use crate::infrastructure::http::dto::{ApiResponse, ProviderResponse};
use crate::infrastructure::http::state::AppState;

/// 已注册的来源站点
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<ProviderResponse>>> {
    let providers = state
        .registry
        .sources()
        .into_iter()
        .map(|(source_key, sub_id_arity)| ProviderResponse {
            source_key,
            sub_id_arity,
        })
        .collect();

    Json(ApiResponse::success(providers))
}

/// 已配置的翻译引擎
pub async fn list_translators(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<TranslatorEngine>>> {
    Json(ApiResponse::success(state.fetcher.available_engines()))
}
