//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NOVELMIX_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NOVELMIX_SERVER__PORT=8080`
/// - `NOVELMIX_TRANSLATOR__BAIDU__APP_ID=2015063000000001`
/// - `NOVELMIX_TRANSLATOR__GPT__API_KEY=sk-...`
/// - `NOVELMIX_DATABASE__PATH=/data/novelmix.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("provider.timeout_secs", 20)?
        .set_default("provider.max_retries", 1)?
        .set_default("provider.chapter_cache_capacity", 256)?
        .set_default("translator.timeout_secs", 30)?
        .set_default("translator.deadline_secs", 90)?
        .set_default("database.path", "data/novelmix.db")?
        .set_default("database.max_connections", 5)?
        .set_default("cache.persistent", true)?
        .set_default("cache.translation_cache_path", "data/translations.sled")?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("NOVELMIX")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Provider timeout cannot be 0".to_string(),
        ));
    }

    if config.translator.timeout_secs == 0 || config.translator.deadline_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Translator timeout and deadline cannot be 0".to_string(),
        ));
    }

    let gpt = &config.translator.gpt;
    if gpt.is_configured() && (gpt.base_url.is_empty() || gpt.model.is_empty()) {
        return Err(ConfigError::ValidationError(
            "GPT translator needs base_url and model".to_string(),
        ));
    }

    if config.cache.persistent && config.cache.translation_cache_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Translation cache path cannot be empty when cache is persistent".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出任何凭据
pub fn print_config(config: &AppConfig) {
    let translator = &config.translator;

    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Provider Timeout: {}s", config.provider.timeout_secs);
    tracing::info!("Provider Retries: {}", config.provider.max_retries);
    tracing::info!("Chapter Cache Capacity: {}", config.provider.chapter_cache_capacity);
    tracing::info!("Translator Timeout: {}s", translator.timeout_secs);
    tracing::info!("Translator Deadline: {}s", translator.deadline_secs);
    tracing::info!(
        "Translators: youdao={} baidu={} gpt={}",
        translator.youdao.is_configured(),
        translator.baidu.is_configured(),
        translator.gpt.is_configured()
    );
    if translator.gpt.is_configured() {
        tracing::info!("GPT: {} ({})", translator.gpt.base_url, translator.gpt.model);
    }
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    if config.cache.persistent {
        tracing::info!("Translation Cache: {}", config.cache.translation_cache_path);
    } else {
        tracing::info!("Translation Cache: in-memory");
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_default_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_deadline() {
        let mut config = AppConfig::default();
        config.translator.deadline_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_gpt_without_model() {
        let mut config = AppConfig::default();
        config.translator.gpt.api_key = "sk-test".to_string();
        config.translator.gpt.model = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[translator.baidu]
app_id = "2015063000000001"
app_key = "12345678"

[cache]
persistent = false
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.translator.baidu.is_configured());
        assert!(!config.translator.youdao.is_configured());
        assert!(!config.cache.persistent);
        assert_eq!(config.translator.deadline_secs, 90);
    }
}
