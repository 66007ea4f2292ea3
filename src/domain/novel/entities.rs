//! Novel Context - Entities

use serde::{Deserialize, Serialize};

/// 段落 - 对齐与渲染的最小单位
///
/// 不变量:
/// - index 在章节内唯一，从 0 开始连续
/// - text 可以为空（空行同样占据一个索引位，保证按索引对齐）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    index: usize,
    text: String,
}

impl Paragraph {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// 章节
///
/// 不变量:
/// - 段落索引从 0 开始连续，顺序即来源站点的呈现顺序
/// - 获取后段落数量不可变，重新获取会产生新的 Chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    source_key: String,
    book_id: String,
    sub_ids: Vec<String>,
    chapter_id: String,
    title: Option<String>,
    paragraphs: Vec<Paragraph>,
}

impl Chapter {
    /// 按来源顺序构建章节，索引由位置决定
    pub fn new<I, S>(
        source_key: impl Into<String>,
        book_id: impl Into<String>,
        sub_ids: Vec<String>,
        chapter_id: impl Into<String>,
        lines: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paragraphs = lines
            .into_iter()
            .enumerate()
            .map(|(index, text)| Paragraph::new(index, text))
            .collect();

        Self {
            source_key: source_key.into(),
            book_id: book_id.into(),
            sub_ids,
            chapter_id: chapter_id.into(),
            title: None,
            paragraphs,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn sub_ids(&self) -> &[String] {
        &self.sub_ids
    }

    /// 书籍完整标识（book_id 与 sub_ids 以 `-` 连接）
    pub fn book_key(&self) -> String {
        std::iter::once(self.book_id.as_str())
            .chain(self.sub_ids.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn chapter_id(&self) -> &str {
        &self.chapter_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// 作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub link: Option<String>,
}

/// 目录条目
///
/// chapter_id 为空时表示卷/分组标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub title: String,
    pub chapter_id: Option<String>,
}

impl TocItem {
    pub fn chapter(title: impl Into<String>, chapter_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapter_id: Some(chapter_id.into()),
        }
    }

    pub fn heading(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapter_id: None,
        }
    }
}

/// 小说元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<Author>,
    pub introduction: String,
    pub toc: Vec<TocItem>,
}

impl Metadata {
    /// 目录中真正指向章节的条目数
    pub fn chapter_count(&self) -> usize {
        self.toc.iter().filter(|item| item.chapter_id.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_indices_are_contiguous() {
        let chapter = Chapter::new("syosetu", "n1234ab", vec![], "1", ["一", "", "三"]);

        let indices: Vec<usize> = chapter.paragraphs().iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(chapter.paragraphs()[1].is_blank());
    }

    #[test]
    fn test_book_key_joins_sub_ids() {
        let chapter = Chapter::new(
            "alphapolis",
            "638978238",
            vec!["525733370".to_string()],
            "6857739",
            Vec::<String>::new(),
        );
        assert_eq!(chapter.book_key(), "638978238-525733370");
    }

    #[test]
    fn test_blank_title_is_dropped() {
        let chapter = Chapter::new("kakuyomu", "1", vec![], "2", ["x"]).with_title("  ");
        assert_eq!(chapter.title(), None);
    }

    #[test]
    fn test_metadata_chapter_count_skips_headings() {
        let metadata = Metadata {
            title: "t".to_string(),
            authors: vec![],
            introduction: String::new(),
            toc: vec![
                TocItem::heading("第一章"),
                TocItem::chapter("第一話", "1"),
                TocItem::chapter("第二話", "2"),
            ],
        };
        assert_eq!(metadata.chapter_count(), 2);
    }
}
