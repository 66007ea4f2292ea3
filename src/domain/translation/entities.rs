//! Translation Context - Entities

use serde::{Deserialize, Serialize};

use super::TranslatorEngine;
use crate::domain::novel::Paragraph;

/// 单个引擎的翻译结果
///
/// paragraphs 应与原文按索引对齐，但不做保证：
/// 可能更短、更长，或缺少部分索引。按索引查找，永不越界。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    engine: TranslatorEngine,
    paragraphs: Option<Vec<Paragraph>>,
}

impl TranslationResult {
    /// 创建翻译结果，段落按索引排序，重复索引保留第一个
    pub fn new(engine: TranslatorEngine, mut paragraphs: Vec<Paragraph>) -> Self {
        paragraphs.sort_by_key(|p| p.index());
        paragraphs.dedup_by_key(|p| p.index());
        Self {
            engine,
            paragraphs: Some(paragraphs),
        }
    }

    /// 引擎没有返回任何内容
    pub fn absent(engine: TranslatorEngine) -> Self {
        Self {
            engine,
            paragraphs: None,
        }
    }

    pub fn engine(&self) -> TranslatorEngine {
        self.engine
    }

    pub fn paragraphs(&self) -> Option<&[Paragraph]> {
        self.paragraphs.as_deref()
    }

    pub fn is_absent(&self) -> bool {
        self.paragraphs.is_none()
    }

    /// 查找指定索引的译文段落
    pub fn paragraph_at(&self, index: usize) -> Option<&Paragraph> {
        let paragraphs = self.paragraphs.as_ref()?;
        paragraphs
            .binary_search_by_key(&index, |p| p.index())
            .ok()
            .map(|pos| &paragraphs[pos])
    }
}

/// 渲染行来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Original,
    Translation,
}

/// 合并引擎的输出单位
///
/// 不变量: engine 存在当且仅当 kind == Translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLine {
    source_paragraph_index: usize,
    kind: LineKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<TranslatorEngine>,
    text: String,
}

impl RenderedLine {
    pub fn original(paragraph: &Paragraph) -> Self {
        Self {
            source_paragraph_index: paragraph.index(),
            kind: LineKind::Original,
            engine: None,
            text: paragraph.text().to_string(),
        }
    }

    pub fn translation(index: usize, engine: TranslatorEngine, text: impl Into<String>) -> Self {
        Self {
            source_paragraph_index: index,
            kind: LineKind::Translation,
            engine: Some(engine),
            text: text.into(),
        }
    }

    pub fn source_paragraph_index(&self) -> usize {
        self.source_paragraph_index
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn engine(&self) -> Option<TranslatorEngine> {
        self.engine
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
