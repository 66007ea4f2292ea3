//! Translation Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("未知的翻译引擎: {0}")]
    UnknownEngine(String),

    #[error("透明度必须在 [0, 1] 范围内: {0}")]
    InvalidOpacity(f32),
}
