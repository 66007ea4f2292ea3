//! Read History Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{Page, ReadHistoryItem, ReadHistoryRepositoryPort};
use crate::application::queries::ListReadHistory;

/// 单页最大条目数
pub const MAX_PAGE_SIZE: usize = 100;

/// ListReadHistory Handler
pub struct ListReadHistoryHandler {
    history_repo: Arc<dyn ReadHistoryRepositoryPort>,
}

impl ListReadHistoryHandler {
    pub fn new(history_repo: Arc<dyn ReadHistoryRepositoryPort>) -> Self {
        Self { history_repo }
    }

    pub async fn handle(
        &self,
        query: ListReadHistory,
    ) -> Result<Page<ReadHistoryItem>, ApplicationError> {
        if query.user_id.trim().is_empty() {
            return Err(ApplicationError::validation("user_id must not be empty"));
        }
        if query.page_size == 0 || query.page_size > MAX_PAGE_SIZE {
            return Err(ApplicationError::validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let page = self
            .history_repo
            .list_read_history(query.user_id.trim(), query.page, query.page_size)
            .await?;

        tracing::debug!(
            user_id = %query.user_id,
            page = query.page,
            items = page.items.len(),
            total = page.total,
            "Read history listed"
        );

        Ok(page)
    }
}
