//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 来源站点配置
    #[serde(default)]
    pub provider: ProviderConfig,

    /// 翻译引擎配置
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 译文缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// ============================================================================
// Server
// ============================================================================

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置（阅读器前端）
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Provider
// ============================================================================

/// 来源站点配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// 单次页面请求超时（秒）
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// 429 / 5xx / 网络错误的重试次数
    #[serde(default = "default_provider_retries")]
    pub max_retries: u32,

    /// 内存章节缓存容量，0 表示不缓存
    #[serde(default = "default_chapter_cache_capacity")]
    pub chapter_cache_capacity: usize,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}

fn default_provider_timeout() -> u64 {
    20
}

fn default_provider_retries() -> u32 {
    1
}

fn default_chapter_cache_capacity() -> usize {
    256
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_provider_timeout(),
            max_retries: default_provider_retries(),
            chapter_cache_capacity: default_chapter_cache_capacity(),
        }
    }
}

// ============================================================================
// Translator
// ============================================================================

/// 翻译引擎配置
///
/// 凭据为空的引擎不启用
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatorConfig {
    /// 单个引擎的超时（秒）
    #[serde(default = "default_translator_timeout")]
    pub timeout_secs: u64,

    /// 一次章节请求等待全部译文的上限（秒）
    #[serde(default = "default_translator_deadline")]
    pub deadline_secs: u64,

    #[serde(default)]
    pub youdao: YoudaoConfig,

    #[serde(default)]
    pub baidu: BaiduConfig,

    #[serde(default)]
    pub gpt: GptConfig,
}

fn default_translator_timeout() -> u64 {
    30
}

fn default_translator_deadline() -> u64 {
    90
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_translator_timeout(),
            deadline_secs: default_translator_deadline(),
            youdao: YoudaoConfig::default(),
            baidu: BaiduConfig::default(),
            gpt: GptConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoudaoConfig {
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub app_secret: String,
}

impl YoudaoConfig {
    pub fn is_configured(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaiduConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: String,
}

impl BaiduConfig {
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.app_key.is_empty()
    }
}

/// OpenAI 兼容的 chat completions 接口
#[derive(Debug, Clone, Deserialize)]
pub struct GptConfig {
    #[serde(default = "default_gpt_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gpt_model")]
    pub model: String,
}

fn default_gpt_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_gpt_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for GptConfig {
    fn default() -> Self {
        Self {
            base_url: default_gpt_base_url(),
            api_key: String::new(),
            model: default_gpt_model(),
        }
    }
}

impl GptConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ============================================================================
// Storage
// ============================================================================

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/novelmix.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 译文缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// false 时使用进程内缓存，重启即丢失
    #[serde(default = "default_cache_persistent")]
    pub persistent: bool,

    /// Sled 数据目录
    #[serde(default = "default_translation_cache_path")]
    pub translation_cache_path: String,
}

fn default_cache_persistent() -> bool {
    true
}

fn default_translation_cache_path() -> String {
    "data/translations.sled".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            persistent: default_cache_persistent(),
            translation_cache_path: default_translation_cache_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5060);
        assert_eq!(config.database.path, "data/novelmix.db");
        assert_eq!(config.provider.chapter_cache_capacity, 256);
        assert!(config.cache.persistent);
    }

    #[test]
    fn test_translators_disabled_without_credentials() {
        let config = TranslatorConfig::default();
        assert!(!config.youdao.is_configured());
        assert!(!config.baidu.is_configured());
        assert!(!config.gpt.is_configured());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.deadline_secs, 90);
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/novelmix.db?mode=rwc");
    }
}
