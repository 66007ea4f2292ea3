//! Translator Port - 翻译引擎抽象
//!
//! 定义机器翻译的抽象接口，具体实现在 infrastructure/translators 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::translation::TranslatorEngine;

/// 翻译错误
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Engine not configured: {0}")]
    NotConfigured(TranslatorEngine),

    #[error("Cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for TranslatorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslatorError::Timeout
        } else if e.is_decode() {
            TranslatorError::InvalidResponse(e.to_string())
        } else {
            TranslatorError::NetworkError(e.to_string())
        }
    }
}

/// Translator Port
///
/// 输入为非空原文行；输出第 k 项对应输入第 k 行，
/// 引擎漏译的行为 None。输出可能比输入短或长，由调用方对齐。
#[async_trait]
pub trait TranslatorPort: Send + Sync {
    fn engine(&self) -> TranslatorEngine;

    async fn translate(&self, lines: &[String]) -> Result<Vec<Option<String>>, TranslatorError>;
}
