//! 小説家になろう (ncode.syosetu.com)
//!
//! 目录分页（每页 100 话），短篇没有目录，正文就在作品首页。

use async_trait::async_trait;
use scraper::Html;

use super::html::{paragraph_lines, select_first, select_text, selector};
use super::SourceHttpClient;
use crate::application::ports::{NovelProviderPort, ProviderError};
use crate::domain::novel::{Author, Chapter, Metadata, TocItem};

const BASE_URL: &str = "https://ncode.syosetu.com";

/// 短篇作品的唯一章节标识
pub const SHORT_STORY_CHAPTER: &str = "default";

/// 目录最多翻页数
const MAX_TOC_PAGES: usize = 100;

const BODY_SELECTORS: [&str; 2] = [
    ".p-novel__body .p-novel__text:not(.p-novel__text--preface):not(.p-novel__text--afterword) p",
    "#novel_honbun p",
];

pub struct SyosetuProvider {
    client: SourceHttpClient,
}

impl SyosetuProvider {
    pub const SOURCE_KEY: &'static str = "syosetu";

    pub fn new(client: SourceHttpClient) -> Self {
        Self { client }
    }

    fn book_url(book_id: &str) -> String {
        format!("{}/{}/", BASE_URL, book_id.to_lowercase())
    }

    fn chapter_url(book_id: &str, chapter_id: &str) -> String {
        if chapter_id == SHORT_STORY_CHAPTER {
            Self::book_url(book_id)
        } else {
            format!("{}/{}/{}/", BASE_URL, book_id.to_lowercase(), chapter_id)
        }
    }
}

#[async_trait]
impl NovelProviderPort for SyosetuProvider {
    fn source_key(&self) -> &'static str {
        Self::SOURCE_KEY
    }

    async fn fetch_metadata(
        &self,
        book_id: &str,
        _sub_ids: &[String],
    ) -> Result<Metadata, ProviderError> {
        let html = self.client.get_text(&Self::book_url(book_id)).await?;
        let (mut metadata, mut next) = parse_metadata_page(&html)?;

        let mut pages = 1;
        while let Some(path) = next.take() {
            if pages >= MAX_TOC_PAGES {
                tracing::warn!(book_id = %book_id, "Syosetu toc page limit reached");
                break;
            }
            let html = self.client.get_text(&format!("{}{}", BASE_URL, path)).await?;
            let (page, page_next) = parse_metadata_page(&html)?;
            metadata.toc.extend(page.toc);
            next = page_next;
            pages += 1;
        }

        Ok(metadata)
    }

    async fn fetch_chapter(
        &self,
        book_id: &str,
        _sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError> {
        let url = Self::chapter_url(book_id, chapter_id);
        let html = self.client.get_text(&url).await?;
        parse_chapter(&html, book_id, chapter_id)
    }
}

/// 解析一页作品信息，返回下一页目录的路径
fn parse_metadata_page(html: &str) -> Result<(Metadata, Option<String>), ProviderError> {
    let document = Html::parse_document(html);

    let title = select_text(&document, ".p-novel__title")?
        .or(select_text(&document, ".novel_title")?)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| not_found_or_parse(&document, "novel title"))?;

    let author = match select_first(&document, ".p-novel__author a")? {
        Some(a) => Author {
            name: a.text().collect::<String>().trim().to_string(),
            link: a.value().attr("href").map(str::to_string),
        },
        None => Author {
            name: select_text(&document, ".p-novel__author")?
                .unwrap_or_default()
                .trim_start_matches("作者：")
                .trim()
                .to_string(),
            link: None,
        },
    };

    let introduction = select_text(&document, "#novel_ex")?.unwrap_or_default();

    let mut toc = Vec::new();
    for item in document.select(&selector(".p-eplist__chapter-title, .p-eplist__subtitle")?) {
        let text = item.text().collect::<String>().trim().to_string();
        match item.value().attr("href") {
            Some(href) => {
                let chapter_id = href.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
                toc.push(TocItem::chapter(text, chapter_id));
            }
            None => toc.push(TocItem::heading(text)),
        }
    }

    // 短篇
    if toc.is_empty() && has_body(&document)? {
        toc.push(TocItem::chapter(title.clone(), SHORT_STORY_CHAPTER));
    }

    let next = select_first(&document, ".c-pager__item--next")?
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    Ok((
        Metadata {
            title,
            authors: vec![author],
            introduction,
            toc,
        },
        next,
    ))
}

fn parse_chapter(html: &str, book_id: &str, chapter_id: &str) -> Result<Chapter, ProviderError> {
    let document = Html::parse_document(html);

    let mut lines = Vec::new();
    for css in BODY_SELECTORS {
        lines = paragraph_lines(&document, css)?;
        if !lines.is_empty() {
            break;
        }
    }
    if lines.is_empty() {
        return Err(not_found_or_parse(&document, "chapter body"));
    }

    let title = select_text(&document, ".p-novel__title")?
        .or(select_text(&document, ".novel_subtitle")?)
        .unwrap_or_default();

    Ok(Chapter::new(
        SyosetuProvider::SOURCE_KEY,
        book_id,
        Vec::new(),
        chapter_id,
        lines,
    )
    .with_title(title))
}

fn has_body(document: &Html) -> Result<bool, ProviderError> {
    for css in BODY_SELECTORS {
        if select_first(document, css)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 站点对不存在的作品返回 200 + 错误页
fn not_found_or_parse(document: &Html, what: &str) -> ProviderError {
    let is_error_page = select_text(document, "title")
        .ok()
        .flatten()
        .is_some_and(|t| t.contains("エラー"));
    if is_error_page {
        ProviderError::NotFound(what.to_string())
    } else {
        ProviderError::parse(format!("syosetu: missing {}", what))
    }
}
