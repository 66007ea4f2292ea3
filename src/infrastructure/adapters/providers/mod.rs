//! Novel Providers - 来源站点适配器
//!
//! 每个来源一个模块，共用 SourceHttpClient

mod alphapolis;
mod cached;
mod hameln;
mod html;
mod http_client;
mod kakuyomu;
mod syosetu;

pub use alphapolis::AlphapolisProvider;
pub use cached::CachedProvider;
pub use hameln::HamelnProvider;
pub use http_client::{SourceHttpClient, SourceHttpClientConfig};
pub use kakuyomu::KakuyomuProvider;
pub use syosetu::SyosetuProvider;

use std::sync::Arc;

use crate::application::ports::NovelProviderPort;

/// 构建全部内置来源，chapter_cache_capacity 为 0 时不缓存章节
pub fn builtin_providers(
    client: SourceHttpClient,
    chapter_cache_capacity: usize,
) -> Vec<Arc<dyn NovelProviderPort>> {
    let providers: Vec<Arc<dyn NovelProviderPort>> = vec![
        Arc::new(SyosetuProvider::new(client.clone())),
        Arc::new(KakuyomuProvider::new(client.clone())),
        Arc::new(AlphapolisProvider::new(client.clone())),
        Arc::new(HamelnProvider::new(client)),
    ];

    providers
        .into_iter()
        .map(|provider| CachedProvider::wrap(provider, chapter_cache_capacity))
        .collect()
}
