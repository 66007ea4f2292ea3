//! Translator Adapters - 机器翻译引擎适配器
//!
//! 原文按字符数切成批次，每批一次请求。
//! 某批返回行数与输入不符时，该批全部视为漏译。

mod baidu;
mod gpt;
mod youdao;

pub use baidu::{BaiduTranslator, BaiduTranslatorConfig};
pub use gpt::{GptTranslator, GptTranslatorConfig};
pub use youdao::{YoudaoTranslator, YoudaoTranslatorConfig};

use crate::domain::translation::TranslatorEngine;

/// 按累计字符数切分，单行超长时独占一批
pub(crate) fn batches(lines: &[String], max_chars: usize) -> Vec<&[String]> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.chars().count() + 1;
        if i > start && chars + len > max_chars {
            result.push(&lines[start..i]);
            start = i;
            chars = 0;
        }
        chars += len;
    }
    if start < lines.len() {
        result.push(&lines[start..]);
    }
    result
}

/// 对齐一批译文
pub(crate) fn align_batch(
    engine: TranslatorEngine,
    expected: usize,
    translated: Vec<String>,
) -> Vec<Option<String>> {
    if translated.len() == expected {
        translated.into_iter().map(Some).collect()
    } else {
        tracing::warn!(
            engine = %engine,
            expected = expected,
            actual = translated.len(),
            "Translated line count mismatch, batch dropped"
        );
        vec![None; expected]
    }
}
