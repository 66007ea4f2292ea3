//! Read History Commands

/// 记录最近阅读章节
#[derive(Debug, Clone)]
pub struct RecordChapterRead {
    pub user_id: String,
    pub novel_id: String,
    pub chapter_id: String,
}

/// 删除某本小说的阅读记录
#[derive(Debug, Clone)]
pub struct DeleteReadHistoryEntry {
    pub user_id: String,
    pub novel_id: String,
}

/// 清空用户全部阅读记录
#[derive(Debug, Clone)]
pub struct ClearReadHistory {
    pub user_id: String,
}
