//! Chapter Queries

use crate::domain::translation::DisplayPolicy;

/// 渲染章节查询（原文 + 译文按显示策略合并）
#[derive(Debug, Clone)]
pub struct RenderChapter {
    /// 组合标识，如 `syosetu-n1234ab`
    pub novel_id: String,
    pub chapter_id: String,
    pub policy: DisplayPolicy,
    /// 提供时顺带记录阅读历史
    pub user_id: Option<String>,
}

/// 获取小说元数据查询
#[derive(Debug, Clone)]
pub struct GetMetadata {
    pub novel_id: String,
}
