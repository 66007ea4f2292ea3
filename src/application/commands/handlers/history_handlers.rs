//! Read History Command Handlers

use std::sync::Arc;

use crate::application::commands::{ClearReadHistory, DeleteReadHistoryEntry, RecordChapterRead};
use crate::application::error::ApplicationError;
use crate::application::ports::ReadHistoryRepositoryPort;
use crate::application::services::ProviderRegistry;

fn require_user(user_id: &str) -> Result<&str, ApplicationError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ApplicationError::validation("user_id must not be empty"));
    }
    Ok(user_id)
}

// ============================================================================
// RecordChapterRead
// ============================================================================

/// RecordChapterRead Handler
///
/// novel_id 先经注册表规范化，`syosetu:n1` 与 `syosetu-n1` 记为同一本
pub struct RecordChapterReadHandler {
    registry: Arc<ProviderRegistry>,
    history_repo: Arc<dyn ReadHistoryRepositoryPort>,
}

impl RecordChapterReadHandler {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        history_repo: Arc<dyn ReadHistoryRepositoryPort>,
    ) -> Self {
        Self {
            registry,
            history_repo,
        }
    }

    pub async fn handle(&self, command: RecordChapterRead) -> Result<(), ApplicationError> {
        let user_id = require_user(&command.user_id)?;
        let chapter_id = command.chapter_id.trim();
        if chapter_id.is_empty() {
            return Err(ApplicationError::validation("chapter_id must not be empty"));
        }

        let novel_id = self.registry.resolve(&command.novel_id)?.novel_id();
        self.history_repo
            .record_chapter_read(user_id, &novel_id, chapter_id)
            .await?;

        tracing::info!(
            user_id = %user_id,
            novel_id = %novel_id,
            chapter_id = %chapter_id,
            "Read history recorded"
        );
        Ok(())
    }
}

// ============================================================================
// DeleteReadHistoryEntry
// ============================================================================

/// DeleteReadHistoryEntry Handler
pub struct DeleteReadHistoryEntryHandler {
    registry: Arc<ProviderRegistry>,
    history_repo: Arc<dyn ReadHistoryRepositoryPort>,
}

impl DeleteReadHistoryEntryHandler {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        history_repo: Arc<dyn ReadHistoryRepositoryPort>,
    ) -> Self {
        Self {
            registry,
            history_repo,
        }
    }

    pub async fn handle(&self, command: DeleteReadHistoryEntry) -> Result<(), ApplicationError> {
        let user_id = require_user(&command.user_id)?;
        let novel_id = self.registry.resolve(&command.novel_id)?.novel_id();

        self.history_repo
            .delete_read_history_entry(user_id, &novel_id)
            .await?;

        tracing::info!(user_id = %user_id, novel_id = %novel_id, "Read history entry deleted");
        Ok(())
    }
}

// ============================================================================
// ClearReadHistory
// ============================================================================

/// ClearReadHistory Handler
pub struct ClearReadHistoryHandler {
    history_repo: Arc<dyn ReadHistoryRepositoryPort>,
}

impl ClearReadHistoryHandler {
    pub fn new(history_repo: Arc<dyn ReadHistoryRepositoryPort>) -> Self {
        Self { history_repo }
    }

    /// 返回删除的条目数
    pub async fn handle(&self, command: ClearReadHistory) -> Result<u64, ApplicationError> {
        let user_id = require_user(&command.user_id)?;
        let deleted = self.history_repo.delete_all_read_history(user_id).await?;

        tracing::info!(user_id = %user_id, deleted = deleted, "Read history cleared");
        Ok(deleted)
    }
}
