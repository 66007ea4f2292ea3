//! Application Services - 跨用例共享的应用服务
//!
//! - ProviderRegistry: 组合标识到来源的解析
//! - TranslationFetcher: 多引擎并发取译文 + 缓存

mod provider_registry;
mod translation_fetcher;

pub use provider_registry::{ProviderRegistry, RegistryError, ResolvedNovel};
pub use translation_fetcher::{
    EngineFailure, FetchOutcome, TranslationFetcher, TranslationFetcherConfig,
};
