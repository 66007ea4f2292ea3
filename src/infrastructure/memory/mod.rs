//! Memory Layer - 进程内实现
//!
//! 不落盘的译文缓存，用于测试和 `cache.persistent = false`

mod translation_cache;

pub use translation_cache::InMemoryTranslationCache;
