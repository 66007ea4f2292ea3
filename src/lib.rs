//! NovelMix - 日文网络小说多译本对照阅读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 段落、章节、元数据
//! - Translation Context: 翻译引擎、显示策略、渲染行
//! - 合并引擎: 原文与多个译本按段落索引对齐合并
//!
//! 应用层 (application/):
//! - Ports: NovelProvider, Translator, TranslationCache, Repositories
//! - Services: ProviderRegistry, TranslationFetcher
//! - Commands / Queries: 阅读历史、元数据、章节渲染
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API
//! - Adapters: 来源站点（syosetu, kakuyomu, alphapolis, hameln）与翻译引擎（youdao, baidu, gpt）
//! - Persistence: SQLite（小说摘要、阅读历史）+ Sled（译文缓存）
//! - Memory: 进程内译文缓存

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
