//! Read History Queries

/// 分页列出阅读历史，page 从 0 开始
#[derive(Debug, Clone)]
pub struct ListReadHistory {
    pub user_id: String,
    pub page: usize,
    pub page_size: usize,
}
