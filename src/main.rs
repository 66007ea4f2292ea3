//! NovelMix - 日文网络小说多译本对照阅读服务
//!
//! 分层:
//! - Domain: novel/, translation/, 合并引擎
//! - Application: ports, services, commands, queries
//! - Infrastructure: http, adapters, persistence, memory

use std::sync::Arc;
use std::time::Duration;

use novelmix::application::{
    ProviderRegistry, TranslationCachePort, TranslationFetcher, TranslationFetcherConfig,
    TranslatorPort,
};
use novelmix::config::{load_config, print_config, TranslatorConfig};
use novelmix::infrastructure::adapters::{
    builtin_providers, BaiduTranslator, BaiduTranslatorConfig, GptTranslator,
    GptTranslatorConfig, SourceHttpClient, SourceHttpClientConfig, YoudaoTranslator,
    YoudaoTranslatorConfig,
};
use novelmix::infrastructure::http::{AppState, HttpServer, ServerConfig};
use novelmix::infrastructure::memory::InMemoryTranslationCache;
use novelmix::infrastructure::persistence::sled::{SledCacheConfig, SledTranslationCache};
use novelmix::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteReadHistoryRepository,
    SqliteWebNovelRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},novelmix={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("NovelMix - 网络小说多译本对照阅读");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let novel_repo = Arc::new(SqliteWebNovelRepository::new(pool.clone()));
    let history_repo = Arc::new(SqliteReadHistoryRepository::new(pool));

    // 来源站点
    let client = SourceHttpClient::new(SourceHttpClientConfig {
        user_agent: config.provider.user_agent.clone(),
        timeout_secs: config.provider.timeout_secs,
        max_retries: config.provider.max_retries,
    })?;
    let registry = Arc::new(ProviderRegistry::new(builtin_providers(
        client,
        config.provider.chapter_cache_capacity,
    )));

    // 翻译引擎
    let translators = build_translators(&config.translator)?;
    if translators.is_empty() {
        tracing::warn!("No translator configured, only original text is available");
    }

    // 译文缓存
    let cache: Arc<dyn TranslationCachePort> = if config.cache.persistent {
        if let Some(parent) = std::path::Path::new(&config.cache.translation_cache_path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Arc::new(SledTranslationCache::new(&SledCacheConfig {
            db_path: config.cache.translation_cache_path.clone(),
        })?)
    } else {
        InMemoryTranslationCache::new().arc()
    };

    let fetcher = Arc::new(TranslationFetcher::new(
        translators,
        cache,
        TranslationFetcherConfig {
            timeout: Duration::from_secs(config.translator.timeout_secs),
        },
    ));

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(&config.server.static_files.dir);
    }
    let state = AppState::new(
        registry,
        fetcher,
        novel_repo,
        history_repo,
        Duration::from_secs(config.translator.deadline_secs),
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 只创建填写了凭据的引擎
fn build_translators(config: &TranslatorConfig) -> anyhow::Result<Vec<Arc<dyn TranslatorPort>>> {
    let mut translators: Vec<Arc<dyn TranslatorPort>> = Vec::new();

    if config.youdao.is_configured() {
        let mut youdao = YoudaoTranslatorConfig::new(&config.youdao.app_key, &config.youdao.app_secret);
        youdao.timeout_secs = config.timeout_secs;
        translators.push(Arc::new(YoudaoTranslator::new(youdao)?));
    }

    if config.baidu.is_configured() {
        let mut baidu = BaiduTranslatorConfig::new(&config.baidu.app_id, &config.baidu.app_key);
        baidu.timeout_secs = config.timeout_secs;
        translators.push(Arc::new(BaiduTranslator::new(baidu)?));
    }

    if config.gpt.is_configured() {
        let mut gpt = GptTranslatorConfig::new(
            &config.gpt.base_url,
            &config.gpt.api_key,
            &config.gpt.model,
        );
        gpt.timeout_secs = config.timeout_secs;
        translators.push(Arc::new(GptTranslator::new(gpt)?));
    }

    for translator in &translators {
        tracing::info!(engine = %translator.engine(), "Translator enabled");
    }

    Ok(translators)
}
