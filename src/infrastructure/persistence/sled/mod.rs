//! Sled Persistence - 译文缓存

mod translation_cache;

pub use translation_cache::{SledCacheConfig, SledTranslationCache};
