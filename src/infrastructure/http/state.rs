//! Application State
//!
//! 持有所有 Command/Query Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    ClearReadHistoryHandler, DeleteReadHistoryEntryHandler, RecordChapterReadHandler,
    // Query handlers
    GetMetadataHandler, ListReadHistoryHandler, RenderChapterHandler,
    // Services
    ProviderRegistry, TranslationFetcher,
    // Ports
    ReadHistoryRepositoryPort, WebNovelRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Services ==========
    pub registry: Arc<ProviderRegistry>,
    pub fetcher: Arc<TranslationFetcher>,

    // ========== Command Handlers ==========
    pub record_read_handler: RecordChapterReadHandler,
    pub delete_history_handler: DeleteReadHistoryEntryHandler,
    pub clear_history_handler: ClearReadHistoryHandler,

    // ========== Query Handlers ==========
    pub get_metadata_handler: GetMetadataHandler,
    pub render_chapter_handler: RenderChapterHandler,
    pub list_history_handler: ListReadHistoryHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `deadline` 是单次章节请求等待译文的上限
    pub fn new(
        registry: Arc<ProviderRegistry>,
        fetcher: Arc<TranslationFetcher>,
        novel_repo: Arc<dyn WebNovelRepositoryPort>,
        history_repo: Arc<dyn ReadHistoryRepositoryPort>,
        deadline: Duration,
    ) -> Self {
        Self {
            // Command handlers
            record_read_handler: RecordChapterReadHandler::new(
                registry.clone(),
                history_repo.clone(),
            ),
            delete_history_handler: DeleteReadHistoryEntryHandler::new(
                registry.clone(),
                history_repo.clone(),
            ),
            clear_history_handler: ClearReadHistoryHandler::new(history_repo.clone()),

            // Query handlers
            get_metadata_handler: GetMetadataHandler::new(registry.clone(), novel_repo),
            render_chapter_handler: RenderChapterHandler::new(
                registry.clone(),
                fetcher.clone(),
                history_repo.clone(),
                deadline,
            ),
            list_history_handler: ListReadHistoryHandler::new(history_repo),

            registry,
            fetcher,
        }
    }
}
