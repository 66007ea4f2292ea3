//! Provider Registry - 来源注册表
//!
//! 启动时构建一次，之后只读，通过 AppState 显式传递，不做全局查找。
//! 新增来源需要重启。

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::NovelProviderPort;

/// 组合标识分隔符，`-` 为规范形式，`:` 亦可
const ID_SEPARATORS: [char; 2] = ['-', ':'];

/// 注册表错误
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Malformed novel id: {0}")]
    MalformedId(String),
}

/// 解析结果
#[derive(Clone)]
pub struct ResolvedNovel {
    pub provider: Arc<dyn NovelProviderPort>,
    pub book_id: String,
    pub sub_ids: Vec<String>,
}

impl ResolvedNovel {
    pub fn source_key(&self) -> &'static str {
        self.provider.source_key()
    }

    /// 规范化的组合标识
    pub fn novel_id(&self) -> String {
        std::iter::once(self.source_key())
            .chain(std::iter::once(self.book_id.as_str()))
            .chain(self.sub_ids.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl std::fmt::Debug for ResolvedNovel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedNovel")
            .field("source_key", &self.source_key())
            .field("book_id", &self.book_id)
            .field("sub_ids", &self.sub_ids)
            .finish()
    }
}

/// 来源注册表
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn NovelProviderPort>>,
}

impl ProviderRegistry {
    /// 构建注册表，来源标识重复时后注册者覆盖前者
    pub fn new(providers: Vec<Arc<dyn NovelProviderPort>>) -> Self {
        let mut map = HashMap::with_capacity(providers.len());
        for provider in providers {
            let key = provider.source_key();
            if map.insert(key, provider).is_some() {
                tracing::warn!(source_key = key, "Duplicate provider registration, replaced");
            }
        }

        tracing::info!(count = map.len(), "Provider registry initialized");
        Self { providers: map }
    }

    /// 解析组合标识 `source-bookId[-subId...]`
    pub fn resolve(&self, composite_id: &str) -> Result<ResolvedNovel, RegistryError> {
        let mut parts = composite_id.trim().split(&ID_SEPARATORS[..]);

        let source_key = parts.next().unwrap_or_default();
        let provider = self
            .providers
            .get(source_key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownSource(source_key.to_string()))?;

        let rest: Vec<&str> = parts.collect();
        let expected = 1 + provider.sub_id_arity();
        if rest.len() != expected || rest.iter().any(|part| part.is_empty()) {
            return Err(RegistryError::MalformedId(format!(
                "{} (source {} expects {} id part(s))",
                composite_id, source_key, expected
            )));
        }

        Ok(ResolvedNovel {
            provider,
            book_id: rest[0].to_string(),
            sub_ids: rest[1..].iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn get(&self, source_key: &str) -> Option<Arc<dyn NovelProviderPort>> {
        self.providers.get(source_key).cloned()
    }

    /// 已注册来源及其子标识个数，按来源标识排序
    pub fn sources(&self) -> Vec<(&'static str, usize)> {
        let mut sources: Vec<_> = self
            .providers
            .values()
            .map(|p| (p.source_key(), p.sub_id_arity()))
            .collect();
        sources.sort();
        sources
    }
}
