//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ProviderError, RepositoryError};
use crate::application::services::RegistryError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 未注册的来源
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// 来源站点不可达（可重试）
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// 来源页面结构变化
    #[error("Source parse error: {0}")]
    ParseError(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::not_found("Record", id),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApplicationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownSource(key) => Self::UnknownSource(key),
            RegistryError::MalformedId(_) => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<ProviderError> for ApplicationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::SourceUnavailable(msg) => Self::SourceUnavailable(msg),
            ProviderError::NotFound(what) => Self::not_found("Source page", what),
            ProviderError::ParseError(msg) => Self::ParseError(msg),
        }
    }
}
