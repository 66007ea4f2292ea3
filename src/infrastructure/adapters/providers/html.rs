//! HTML 解析辅助函数

use scraper::{ElementRef, Html, Selector};

use crate::application::ports::ProviderError;

pub(super) fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::parse(format!("invalid selector {}: {:?}", css, e)))
}

/// 第一个匹配元素
pub(super) fn select_first<'a>(
    document: &'a Html,
    css: &str,
) -> Result<Option<ElementRef<'a>>, ProviderError> {
    Ok(document.select(&selector(css)?).next())
}

/// 第一个匹配元素的文本（已去首尾空白）
pub(super) fn select_text(document: &Html, css: &str) -> Result<Option<String>, ProviderError> {
    Ok(select_first(document, css)?.map(|el| element_text(el).trim().to_string()))
}

/// 元素的可见文本
///
/// 跳过 ruby 注音（rt/rp），`<br>` 转为换行，源码中的换行符丢弃
pub(super) fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
            continue;
        }
        if let Some(child) = ElementRef::wrap(child) {
            match child.value().name() {
                "rt" | "rp" => {}
                "br" => out.push('\n'),
                _ => collect_text(child, out),
            }
        }
    }
}

/// 以 `<br>` 分行的正文，每行一个段落
///
/// 最后一个 `<br>` 之后只剩空白时视为行结束符，不产生段落；其余空行都保留
pub(super) fn br_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines: Vec<String> = element_text(element)
        .split('\n')
        .map(|line| line.trim_end().to_string())
        .collect();
    if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// 每个匹配元素一个段落，空元素也占一个位置
pub(super) fn paragraph_lines(document: &Html, css: &str) -> Result<Vec<String>, ProviderError> {
    Ok(document
        .select(&selector(css)?)
        .map(|p| element_text(p).trim_end().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruby_annotations_are_skipped() {
        let doc = Html::parse_fragment(
            r#"<p id="x"><ruby>魔法<rp>(</rp><rt>まほう</rt><rp>)</rp></ruby>を使う</p>"#,
        );
        let p = select_first(&doc, "#x").unwrap().unwrap();
        assert_eq!(element_text(p), "魔法を使う");
    }

    #[test]
    fn test_br_lines_keep_blank_lines() {
        let doc = Html::parse_fragment("<div id=\"b\"><br>\n一行目<br>\n<br>\n　三行目<br>\n</div>");
        let body = select_first(&doc, "#b").unwrap().unwrap();
        assert_eq!(br_lines(body), vec!["", "一行目", "", "　三行目"]);
    }

    #[test]
    fn test_edge_blank_paragraphs_keep_their_slot() {
        let doc = Html::parse_fragment(
            "<div id=\"body\"><p><br></p><p>本文</p><p></p></div>",
        );
        let lines = paragraph_lines(&doc, "#body p").unwrap();
        assert_eq!(lines, vec!["", "本文", ""]);
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        assert!(matches!(selector("p[["), Err(ProviderError::ParseError(_))));
    }
}
