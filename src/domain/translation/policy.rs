//! Translation Context - Display Policy

use serde::{Deserialize, Serialize};

use super::{BlendOpacity, DisplayMode, TranslationError, TranslationSelection, TranslatorEngine};

/// 用户选择的阅读显示策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDisplayPolicy")]
pub struct DisplayPolicy {
    mode: DisplayMode,
    translation_selection: TranslationSelection,
    engine_preference: Vec<TranslatorEngine>,
    blend_opacity_hint: BlendOpacity,
}

impl DisplayPolicy {
    /// 创建显示策略，engine_preference 中重复的引擎只保留第一次出现
    pub fn new(
        mode: DisplayMode,
        translation_selection: TranslationSelection,
        engine_preference: Vec<TranslatorEngine>,
        blend_opacity_hint: f32,
    ) -> Result<Self, TranslationError> {
        let mut deduped = Vec::with_capacity(engine_preference.len());
        for engine in engine_preference {
            if !deduped.contains(&engine) {
                deduped.push(engine);
            }
        }

        Ok(Self {
            mode,
            translation_selection,
            engine_preference: deduped,
            blend_opacity_hint: BlendOpacity::new(blend_opacity_hint)?,
        })
    }

    /// 仅原文
    pub fn original_only() -> Self {
        Self {
            mode: DisplayMode::OriginalOnly,
            translation_selection: TranslationSelection::Priority,
            engine_preference: Vec::new(),
            blend_opacity_hint: BlendOpacity::default(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn translation_selection(&self) -> TranslationSelection {
        self.translation_selection
    }

    pub fn engine_preference(&self) -> &[TranslatorEngine] {
        &self.engine_preference
    }

    pub fn blend_opacity_hint(&self) -> f32 {
        self.blend_opacity_hint.value()
    }

    /// 需要向翻译获取器请求的引擎
    ///
    /// original-only 不需要任何译文
    pub fn requested_engines(&self) -> &[TranslatorEngine] {
        match self.mode {
            DisplayMode::OriginalOnly => &[],
            _ => &self.engine_preference,
        }
    }
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            mode: DisplayMode::InterleaveOriginalThenTranslation,
            translation_selection: TranslationSelection::Priority,
            engine_preference: vec![
                TranslatorEngine::Gpt,
                TranslatorEngine::Youdao,
                TranslatorEngine::Baidu,
            ],
            blend_opacity_hint: BlendOpacity::default(),
        }
    }
}

/// 反序列化中间结构，经校验后转为 DisplayPolicy
#[derive(Debug, Deserialize)]
struct RawDisplayPolicy {
    mode: DisplayMode,
    #[serde(default = "default_selection")]
    translation_selection: TranslationSelection,
    #[serde(default)]
    engine_preference: Vec<TranslatorEngine>,
    #[serde(default = "default_opacity")]
    blend_opacity_hint: f32,
}

fn default_selection() -> TranslationSelection {
    TranslationSelection::Priority
}

fn default_opacity() -> f32 {
    BlendOpacity::default().value()
}

impl TryFrom<RawDisplayPolicy> for DisplayPolicy {
    type Error = TranslationError;

    fn try_from(raw: RawDisplayPolicy) -> Result<Self, Self::Error> {
        DisplayPolicy::new(
            raw.mode,
            raw.translation_selection,
            raw.engine_preference,
            raw.blend_opacity_hint,
        )
    }
}
