//! Translation Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::TranslationError;

/// 翻译引擎
///
/// 声明顺序即 parallel 模式下的稳定输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorEngine {
    Youdao,
    Baidu,
    Gpt,
}

impl TranslatorEngine {
    /// 全部引擎（声明顺序）
    pub const ALL: [TranslatorEngine; 3] = [
        TranslatorEngine::Youdao,
        TranslatorEngine::Baidu,
        TranslatorEngine::Gpt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatorEngine::Youdao => "youdao",
            TranslatorEngine::Baidu => "baidu",
            TranslatorEngine::Gpt => "gpt",
        }
    }
}

impl FromStr for TranslatorEngine {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youdao" => Ok(TranslatorEngine::Youdao),
            "baidu" => Ok(TranslatorEngine::Baidu),
            "gpt" => Ok(TranslatorEngine::Gpt),
            other => Err(TranslationError::UnknownEngine(other.to_string())),
        }
    }
}

impl std::fmt::Display for TranslatorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阅读显示模式
///
/// 也接受阅读器旧设置里的 `jp` / `zh` / `mix` / `mix-reverse`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// 仅原文
    #[serde(alias = "jp")]
    OriginalOnly,
    /// 仅译文（缺失时回退原文）
    #[serde(alias = "zh")]
    TranslatedOnly,
    /// 原文在前，译文在后
    #[serde(alias = "mix")]
    InterleaveOriginalThenTranslation,
    /// 译文在前，原文在后
    #[serde(alias = "mix-reverse")]
    InterleaveTranslationThenOriginal,
}

/// 译文选择策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationSelection {
    /// 显示所有成功获取的引擎
    Parallel,
    /// 按偏好顺序取第一个可用引擎
    Priority,
}

/// 原文混排透明度提示，范围 [0, 1]
///
/// 仅做范围校验，原样透传给展示层
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BlendOpacity(f32);

impl BlendOpacity {
    pub fn new(value: f32) -> Result<Self, TranslationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(TranslationError::InvalidOpacity(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for BlendOpacity {
    fn default() -> Self {
        Self(0.4)
    }
}
