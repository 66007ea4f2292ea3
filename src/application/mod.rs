//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Provider、Translator、TranslationCache、Repository）
//! - services: ProviderRegistry、TranslationFetcher
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    handlers::{ClearReadHistoryHandler, DeleteReadHistoryEntryHandler, RecordChapterReadHandler},
    ClearReadHistory, DeleteReadHistoryEntry, RecordChapterRead,
};

pub use error::ApplicationError;

pub use ports::{
    // Provider
    NovelProviderPort,
    ProviderError,
    // Translator
    TranslatorError,
    TranslatorPort,
    // Translation cache
    CacheError,
    CacheStats,
    TranslationCacheKey,
    TranslationCachePort,
    // Repositories
    NovelSummary,
    Page,
    ReadHistoryItem,
    ReadHistoryRecord,
    ReadHistoryRepositoryPort,
    RepositoryError,
    WebNovelRepositoryPort,
};

pub use queries::{
    handlers::{
        GetMetadataHandler, ListReadHistoryHandler, MetadataResponse, RenderChapterHandler,
        RenderedChapterResponse,
    },
    GetMetadata, ListReadHistory, RenderChapter,
};

pub use services::{
    EngineFailure, FetchOutcome, ProviderRegistry, RegistryError, ResolvedNovel,
    TranslationFetcher, TranslationFetcherConfig,
};
