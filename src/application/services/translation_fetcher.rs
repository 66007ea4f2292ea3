//! Translation Fetcher - 译文获取服务
//!
//! 对一个章节并发请求多个翻译引擎，先查缓存，未命中再调用引擎。
//! 单个引擎失败只记录在 failures 中，不影响其他引擎。
//! 调用方取消后不再写缓存。

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    TranslationCacheKey, TranslationCachePort, TranslatorError, TranslatorPort,
};
use crate::domain::novel::{Chapter, Paragraph};
use crate::domain::translation::{TranslationResult, TranslatorEngine};

/// Fetcher 配置
#[derive(Debug, Clone)]
pub struct TranslationFetcherConfig {
    /// 单个引擎的超时时间
    pub timeout: Duration,
}

impl Default for TranslationFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// 单个引擎的失败记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineFailure {
    pub engine: TranslatorEngine,
    pub error: String,
}

impl EngineFailure {
    fn new(engine: TranslatorEngine, error: &TranslatorError) -> Self {
        Self {
            engine,
            error: error.to_string(),
        }
    }
}

/// 并发获取结果
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub results: HashMap<TranslatorEngine, TranslationResult>,
    pub failures: Vec<EngineFailure>,
}

/// 译文获取服务
pub struct TranslationFetcher {
    translators: HashMap<TranslatorEngine, Arc<dyn TranslatorPort>>,
    cache: Arc<dyn TranslationCachePort>,
    config: TranslationFetcherConfig,
}

impl TranslationFetcher {
    pub fn new(
        translators: Vec<Arc<dyn TranslatorPort>>,
        cache: Arc<dyn TranslationCachePort>,
        config: TranslationFetcherConfig,
    ) -> Self {
        let translators: HashMap<_, _> = translators
            .into_iter()
            .map(|t| (t.engine(), t))
            .collect();

        tracing::info!(
            engines = ?translators.keys().collect::<Vec<_>>(),
            timeout_secs = config.timeout.as_secs(),
            "TranslationFetcher initialized"
        );

        Self {
            translators,
            cache,
            config,
        }
    }

    /// 已配置的引擎，按声明顺序
    pub fn available_engines(&self) -> Vec<TranslatorEngine> {
        TranslatorEngine::ALL
            .iter()
            .copied()
            .filter(|engine| self.translators.contains_key(engine))
            .collect()
    }

    /// 获取单个引擎的译文
    pub async fn fetch_translation(
        &self,
        chapter: Arc<Chapter>,
        engine: TranslatorEngine,
        cancel: CancellationToken,
    ) -> Result<TranslationResult, TranslatorError> {
        let translator = self
            .translators
            .get(&engine)
            .cloned()
            .ok_or(TranslatorError::NotConfigured(engine))?;

        fetch_one(translator, self.cache.clone(), chapter, self.config.timeout, cancel).await
    }

    /// 并发获取多个引擎的译文
    ///
    /// 每个请求的引擎要么出现在 results 中，要么出现在 failures 中。
    /// 丢弃返回的 future 会中止所有进行中的引擎请求。
    pub async fn fetch_all(
        &self,
        chapter: Arc<Chapter>,
        engines: &[TranslatorEngine],
        cancel: CancellationToken,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let mut requested = HashSet::new();
        let mut tasks = JoinSet::new();

        for &engine in engines {
            if !requested.insert(engine) {
                continue;
            }

            let Some(translator) = self.translators.get(&engine).cloned() else {
                outcome
                    .failures
                    .push(EngineFailure::new(engine, &TranslatorError::NotConfigured(engine)));
                continue;
            };

            let cache = self.cache.clone();
            let chapter = chapter.clone();
            let cancel = cancel.clone();
            let timeout = self.config.timeout;

            tasks.spawn(async move {
                let result = fetch_one(translator, cache, chapter, timeout, cancel).await;
                (engine, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((engine, Ok(result))) => {
                    outcome.results.insert(engine, result);
                }
                Ok((engine, Err(e))) => {
                    tracing::warn!(
                        engine = %engine,
                        chapter_id = %chapter.chapter_id(),
                        error = %e,
                        "Translation engine failed"
                    );
                    outcome.failures.push(EngineFailure::new(engine, &e));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Translation task panicked or was aborted");
                }
            }
        }

        // 任务异常退出的引擎也要有记录
        for engine in TranslatorEngine::ALL {
            let reported = outcome.results.contains_key(&engine)
                || outcome.failures.iter().any(|f| f.engine == engine);
            if requested.contains(&engine) && !reported {
                outcome.failures.push(EngineFailure {
                    engine,
                    error: "Translation task aborted".to_string(),
                });
            }
        }

        outcome.failures.sort_by_key(|f| f.engine);
        outcome
    }
}

async fn fetch_one(
    translator: Arc<dyn TranslatorPort>,
    cache: Arc<dyn TranslationCachePort>,
    chapter: Arc<Chapter>,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<TranslationResult, TranslatorError> {
    let engine = translator.engine();
    let key = TranslationCacheKey::for_chapter(&chapter, engine);

    match cache.get(&key).await {
        Ok(Some(cached)) => {
            tracing::debug!(key = %key, "Translation cache hit");
            return Ok(cached);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Translation cache read failed");
        }
    }

    // 空白段落不送引擎；段内换行拆成单独的行，译完再拼回
    let mut lines: Vec<String> = Vec::new();
    let mut layout: Vec<(usize, Vec<Piece>)> = Vec::new();
    for paragraph in chapter.paragraphs().iter().filter(|p| !p.is_blank()) {
        let pieces = paragraph
            .text()
            .split('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    Piece::Blank
                } else {
                    lines.push(line.to_string());
                    Piece::Sent(lines.len() - 1)
                }
            })
            .collect();
        layout.push((paragraph.index(), pieces));
    }

    let translated = if lines.is_empty() {
        Vec::new()
    } else {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TranslatorError::Cancelled),
            result = tokio::time::timeout(timeout, translator.translate(&lines)) => match result {
                Ok(translated) => translated?,
                Err(_) => return Err(TranslatorError::Timeout),
            },
        }
    };

    let mut paragraphs: Vec<Paragraph> = chapter
        .paragraphs()
        .iter()
        .filter(|p| p.is_blank())
        .map(|p| Paragraph::new(p.index(), ""))
        .collect();

    let mut missing = 0;
    for (index, pieces) in &layout {
        let parts: Option<Vec<&str>> = pieces
            .iter()
            .map(|piece| match piece {
                Piece::Sent(i) => translated.get(*i).and_then(|t| t.as_deref()),
                Piece::Blank => Some(""),
            })
            .collect();
        match parts {
            Some(parts) => paragraphs.push(Paragraph::new(*index, parts.join("\n"))),
            None => missing += 1,
        }
    }

    if cancel.is_cancelled() {
        return Err(TranslatorError::Cancelled);
    }

    if !layout.is_empty() && missing == layout.len() {
        return Err(TranslatorError::InvalidResponse(
            "no paragraph was translated".to_string(),
        ));
    }

    let result = TranslationResult::new(engine, paragraphs);
    if missing == 0 {
        if let Err(e) = cache.put(&key, &result).await {
            tracing::warn!(key = %key, error = %e, "Translation cache write failed");
        }
    } else {
        // 不完整的译文不缓存，下次请求重新翻译
        tracing::warn!(
            key = %key,
            missing = missing,
            paragraphs = layout.len(),
            "Partial translation, not cached"
        );
    }

    tracing::debug!(
        key = %key,
        lines = lines.len(),
        "Translation fetched"
    );
    Ok(result)
}

/// 非空段落中的一行
enum Piece {
    /// 送往引擎的行号
    Sent(usize),
    Blank,
}
