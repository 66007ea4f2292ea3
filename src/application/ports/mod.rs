//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod provider;
mod repositories;
mod translation_cache;
mod translator;

pub use provider::{NovelProviderPort, ProviderError};
pub use repositories::{
    NovelSummary, Page, ReadHistoryItem, ReadHistoryRecord, ReadHistoryRepositoryPort,
    RepositoryError, WebNovelRepositoryPort,
};
pub use translation_cache::{CacheError, CacheStats, TranslationCacheKey, TranslationCachePort};
pub use translator::{TranslatorError, TranslatorPort};
