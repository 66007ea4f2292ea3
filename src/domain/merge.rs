//! 原文/译文合并引擎
//!
//! 纯函数：无 I/O，不修改输入，相同输入产生相同输出。
//!
//! 对齐规则:
//! - 只有原文与译文中都存在的索引参与对齐
//! - 译文多出的段落直接忽略
//! - 译文缺失的索引回退到原文，任何模式下都不会丢行

use std::collections::HashMap;

use crate::domain::novel::{Chapter, Paragraph};
use crate::domain::translation::{
    DisplayMode, DisplayPolicy, RenderedLine, TranslationResult, TranslationSelection,
    TranslatorEngine,
};

/// 合并原文与译文
pub fn merge(
    original: &Chapter,
    translations: &HashMap<TranslatorEngine, TranslationResult>,
    policy: &DisplayPolicy,
) -> Vec<RenderedLine> {
    let paragraphs = original.paragraphs();
    let mut lines = Vec::with_capacity(paragraphs.len() * 2);

    for paragraph in paragraphs {
        let translated = match policy.mode() {
            DisplayMode::OriginalOnly => Vec::new(),
            _ => select_translations(paragraph.index(), translations, policy),
        };

        match policy.mode() {
            DisplayMode::OriginalOnly => lines.push(RenderedLine::original(paragraph)),
            DisplayMode::TranslatedOnly => {
                if translated.is_empty() {
                    lines.push(RenderedLine::original(paragraph));
                } else {
                    lines.extend(translated);
                }
            }
            DisplayMode::InterleaveOriginalThenTranslation => {
                lines.push(RenderedLine::original(paragraph));
                lines.extend(translated);
            }
            DisplayMode::InterleaveTranslationThenOriginal => {
                lines.extend(translated);
                lines.push(RenderedLine::original(paragraph));
            }
        }
    }

    lines
}

/// 按选择策略取出指定索引的译文行
fn select_translations(
    index: usize,
    translations: &HashMap<TranslatorEngine, TranslationResult>,
    policy: &DisplayPolicy,
) -> Vec<RenderedLine> {
    match policy.translation_selection() {
        TranslationSelection::Priority => policy
            .engine_preference()
            .iter()
            .find_map(|engine| translated_paragraph(translations, *engine, index))
            .map(|(engine, p)| vec![RenderedLine::translation(index, engine, p.text())])
            .unwrap_or_default(),
        TranslationSelection::Parallel => TranslatorEngine::ALL
            .iter()
            .filter_map(|engine| translated_paragraph(translations, *engine, index))
            .map(|(engine, p)| RenderedLine::translation(index, engine, p.text()))
            .collect(),
    }
}

fn translated_paragraph(
    translations: &HashMap<TranslatorEngine, TranslationResult>,
    engine: TranslatorEngine,
    index: usize,
) -> Option<(TranslatorEngine, &Paragraph)> {
    translations
        .get(&engine)
        .and_then(|result| result.paragraph_at(index))
        .map(|p| (engine, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::translation::LineKind;

    fn chapter(lines: &[&str]) -> Chapter {
        Chapter::new("syosetu", "n0000aa", vec![], "1", lines.iter().copied())
    }

    fn result(engine: TranslatorEngine, texts: &[&str]) -> TranslationResult {
        TranslationResult::new(
            engine,
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Paragraph::new(i, *t))
                .collect(),
        )
    }

    fn policy(
        mode: DisplayMode,
        selection: TranslationSelection,
        preference: Vec<TranslatorEngine>,
    ) -> DisplayPolicy {
        DisplayPolicy::new(mode, selection, preference, 0.4).unwrap()
    }

    #[test]
    fn test_original_only_ignores_translations() {
        let original = chapter(&["a", "", "c"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Gpt, result(TranslatorEngine::Gpt, &["A", "", "C"]));

        let lines = merge(&original, &translations, &DisplayPolicy::original_only());

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.kind() == LineKind::Original));
        let indices: Vec<usize> = lines.iter().map(|l| l.source_paragraph_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_priority_uses_only_present_engine_with_fallback() {
        let original = chapter(&["a", "b", "c", "d"]);
        let mut translations = HashMap::new();
        translations.insert(
            TranslatorEngine::Baidu,
            TranslationResult::new(
                TranslatorEngine::Baidu,
                vec![Paragraph::new(0, "A"), Paragraph::new(2, "C")],
            ),
        );
        let policy = policy(
            DisplayMode::TranslatedOnly,
            TranslationSelection::Priority,
            vec![TranslatorEngine::Gpt, TranslatorEngine::Youdao, TranslatorEngine::Baidu],
        );

        let lines = merge(&original, &translations, &policy);

        assert_eq!(lines.len(), 4);
        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["A", "b", "C", "d"]);
        assert_eq!(lines[0].engine(), Some(TranslatorEngine::Baidu));
        assert_eq!(lines[1].kind(), LineKind::Original);
        assert_eq!(lines[1].engine(), None);
    }

    #[test]
    fn test_priority_prefers_earlier_engine_per_index() {
        let original = chapter(&["a", "b"]);
        let mut translations = HashMap::new();
        translations.insert(
            TranslatorEngine::Gpt,
            TranslationResult::new(TranslatorEngine::Gpt, vec![Paragraph::new(1, "gpt-b")]),
        );
        translations.insert(TranslatorEngine::Youdao, result(TranslatorEngine::Youdao, &["yd-a", "yd-b"]));
        let policy = policy(
            DisplayMode::TranslatedOnly,
            TranslationSelection::Priority,
            vec![TranslatorEngine::Gpt, TranslatorEngine::Youdao],
        );

        let lines = merge(&original, &translations, &policy);

        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["yd-a", "gpt-b"]);
    }

    #[test]
    fn test_parallel_interleave_counts_and_stable_order() {
        let original = chapter(&["a", "b", "c"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Gpt, result(TranslatorEngine::Gpt, &["g0", "g1", "g2"]));
        translations.insert(TranslatorEngine::Youdao, result(TranslatorEngine::Youdao, &["y0", "y1", "y2"]));
        let policy = policy(
            DisplayMode::InterleaveOriginalThenTranslation,
            TranslationSelection::Parallel,
            vec![TranslatorEngine::Gpt, TranslatorEngine::Youdao],
        );

        let first = merge(&original, &translations, &policy);
        let second = merge(&original, &translations, &policy);

        assert_eq!(first.len(), 9);
        assert_eq!(first, second);
        let texts: Vec<&str> = first.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["a", "y0", "g0", "b", "y1", "g1", "c", "y2", "g2"]);
    }

    #[test]
    fn test_translation_then_original_order() {
        let original = chapter(&["a", "b"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Baidu, result(TranslatorEngine::Baidu, &["A"]));
        let policy = policy(
            DisplayMode::InterleaveTranslationThenOriginal,
            TranslationSelection::Priority,
            vec![TranslatorEngine::Baidu],
        );

        let lines = merge(&original, &translations, &policy);

        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["A", "a", "b"]);
    }

    #[test]
    fn test_translated_only_without_translations_equals_original_only() {
        let original = chapter(&["a", "", "c"]);
        let translations = HashMap::new();

        for selection in [TranslationSelection::Priority, TranslationSelection::Parallel] {
            let policy = policy(
                DisplayMode::TranslatedOnly,
                selection,
                vec![TranslatorEngine::Gpt],
            );
            assert_eq!(
                merge(&original, &translations, &policy),
                merge(&original, &translations, &DisplayPolicy::original_only())
            );
        }
    }

    #[test]
    fn test_short_translation_falls_back_for_missing_tail() {
        let original = chapter(&["a", "b", "c", "d", "e"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Youdao, result(TranslatorEngine::Youdao, &["A", "B", "C"]));

        for selection in [TranslationSelection::Priority, TranslationSelection::Parallel] {
            let policy = policy(
                DisplayMode::TranslatedOnly,
                selection,
                vec![TranslatorEngine::Youdao],
            );
            let lines = merge(&original, &translations, &policy);

            assert_eq!(lines.len(), 5);
            assert_eq!(lines[3].text(), "d");
            assert_eq!(lines[3].kind(), LineKind::Original);
            assert_eq!(lines[4].text(), "e");
            assert_eq!(lines[4].kind(), LineKind::Original);
        }
    }

    #[test]
    fn test_extra_translation_paragraphs_are_ignored() {
        let original = chapter(&["a"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Gpt, result(TranslatorEngine::Gpt, &["A", "B", "C"]));
        let policy = policy(
            DisplayMode::InterleaveOriginalThenTranslation,
            TranslationSelection::Parallel,
            vec![TranslatorEngine::Gpt],
        );

        let lines = merge(&original, &translations, &policy);

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.source_paragraph_index() == 0));
    }

    #[test]
    fn test_absent_result_behaves_like_missing_engine() {
        let original = chapter(&["a", "b"]);
        let mut translations = HashMap::new();
        translations.insert(TranslatorEngine::Gpt, TranslationResult::absent(TranslatorEngine::Gpt));
        translations.insert(TranslatorEngine::Baidu, result(TranslatorEngine::Baidu, &["A", "B"]));
        let policy = policy(
            DisplayMode::TranslatedOnly,
            TranslationSelection::Priority,
            vec![TranslatorEngine::Gpt, TranslatorEngine::Baidu],
        );

        let lines = merge(&original, &translations, &policy);

        assert!(lines.iter().all(|l| l.engine() == Some(TranslatorEngine::Baidu)));
    }

    #[test]
    fn test_interleave_output_never_shorter_than_original() {
        let original = chapter(&["a", "b", "c"]);
        let mut translations = HashMap::new();
        translations.insert(
            TranslatorEngine::Youdao,
            TranslationResult::new(TranslatorEngine::Youdao, vec![Paragraph::new(1, "B")]),
        );

        for mode in [
            DisplayMode::InterleaveOriginalThenTranslation,
            DisplayMode::InterleaveTranslationThenOriginal,
        ] {
            let policy = policy(mode, TranslationSelection::Parallel, vec![TranslatorEngine::Youdao]);
            let lines = merge(&original, &translations, &policy);
            assert_eq!(lines.len(), 4);
            assert!(lines.len() >= original.paragraph_count());
        }
    }
}
