//! カクヨム (kakuyomu.jp)
//!
//! 作品信息在 `__NEXT_DATA__` 的 Apollo 缓存中，正文是普通 HTML。

use async_trait::async_trait;
use scraper::Html;
use serde_json::Value;

use super::html::{paragraph_lines, select_first, select_text};
use super::SourceHttpClient;
use crate::application::ports::{NovelProviderPort, ProviderError};
use crate::domain::novel::{Author, Chapter, Metadata, TocItem};

const BASE_URL: &str = "https://kakuyomu.jp";

pub struct KakuyomuProvider {
    client: SourceHttpClient,
}

impl KakuyomuProvider {
    pub const SOURCE_KEY: &'static str = "kakuyomu";

    pub fn new(client: SourceHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NovelProviderPort for KakuyomuProvider {
    fn source_key(&self) -> &'static str {
        Self::SOURCE_KEY
    }

    async fn fetch_metadata(
        &self,
        book_id: &str,
        _sub_ids: &[String],
    ) -> Result<Metadata, ProviderError> {
        let url = format!("{}/works/{}", BASE_URL, book_id);
        let html = self.client.get_text(&url).await?;
        parse_metadata(&html, book_id)
    }

    async fn fetch_chapter(
        &self,
        book_id: &str,
        _sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError> {
        let url = format!("{}/works/{}/episodes/{}", BASE_URL, book_id, chapter_id);
        let html = self.client.get_text(&url).await?;
        parse_chapter(&html, book_id, chapter_id)
    }
}

fn parse_metadata(html: &str, book_id: &str) -> Result<Metadata, ProviderError> {
    let document = Html::parse_document(html);
    let script = select_first(&document, "script#__NEXT_DATA__")?
        .ok_or_else(|| ProviderError::parse("kakuyomu: missing __NEXT_DATA__"))?;
    let data: Value = serde_json::from_str(&script.text().collect::<String>())
        .map_err(|e| ProviderError::parse(format!("kakuyomu: invalid __NEXT_DATA__: {}", e)))?;

    let state = data
        .pointer("/props/pageProps/__APOLLO_STATE__")
        .ok_or_else(|| ProviderError::parse("kakuyomu: missing apollo state"))?;

    let work = state
        .get(format!("Work:{}", book_id))
        .ok_or_else(|| ProviderError::NotFound(format!("kakuyomu work {}", book_id)))?;

    let title = str_field(work, "title")
        .ok_or_else(|| ProviderError::parse("kakuyomu: work without title"))?;
    let introduction = str_field(work, "introduction").unwrap_or_default();

    let authors = resolve_ref(state, &work["author"])
        .map(|user| {
            let name = str_field(user, "activityName")
                .or_else(|| str_field(user, "name"))
                .unwrap_or_default();
            let link = str_field(user, "name").map(|login| format!("{}/users/{}", BASE_URL, login));
            vec![Author { name, link }]
        })
        .unwrap_or_default();

    let mut toc = Vec::new();
    for entry in work["tableOfContents"].as_array().into_iter().flatten() {
        let Some(entry) = resolve_ref(state, entry) else {
            continue;
        };

        if let Some(chapter) = resolve_ref(state, &entry["chapter"]) {
            toc.push(TocItem::heading(str_field(chapter, "title").unwrap_or_default()));
        }

        for episode in entry["episodeUnions"].as_array().into_iter().flatten() {
            if let Some(episode) = resolve_ref(state, episode) {
                if let Some(id) = str_field(episode, "id") {
                    toc.push(TocItem::chapter(
                        str_field(episode, "title").unwrap_or_default(),
                        id,
                    ));
                }
            }
        }
    }

    Ok(Metadata {
        title,
        authors,
        introduction,
        toc,
    })
}

/// Apollo 规范化缓存中的 `{"__ref": "Type:id"}`
fn resolve_ref<'a>(state: &'a Value, value: &Value) -> Option<&'a Value> {
    let key = value.get("__ref")?.as_str()?;
    state.get(key)
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field)?.as_str().map(str::to_string)
}

fn parse_chapter(html: &str, book_id: &str, chapter_id: &str) -> Result<Chapter, ProviderError> {
    let document = Html::parse_document(html);

    let lines = paragraph_lines(&document, ".widget-episodeBody p")?;
    if lines.is_empty() {
        return Err(ProviderError::parse("kakuyomu: missing episode body"));
    }

    let title = select_text(&document, ".widget-episodeTitle")?.unwrap_or_default();

    Ok(Chapter::new(
        KakuyomuProvider::SOURCE_KEY,
        book_id,
        Vec::new(),
        chapter_id,
        lines,
    )
    .with_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_PAGE: &str = r#"<html><body>
<script id="__NEXT_DATA__" type="application/json">
{"props":{"pageProps":{"__APOLLO_STATE__":{
  "Work:1177354054":{"id":"1177354054","title":"転生したら","introduction":"紹介文","author":{"__ref":"UserAccount:9"},
    "tableOfContents":[{"__ref":"TableOfContentsChapter:a"},{"__ref":"TableOfContentsChapter:b"}]},
  "UserAccount:9":{"activityName":"作者名","name":"writer9"},
  "TableOfContentsChapter:a":{"chapter":null,"episodeUnions":[{"__ref":"Episode:100"}]},
  "TableOfContentsChapter:b":{"chapter":{"__ref":"Chapter:c2"},"episodeUnions":[{"__ref":"Episode:101"},{"__ref":"Episode:102"}]},
  "Chapter:c2":{"title":"第二章"},
  "Episode:100":{"id":"100","title":"序"},
  "Episode:101":{"id":"101","title":"一"},
  "Episode:102":{"id":"102","title":"二"}
}}}}
</script></body></html>"#;

    #[test]
    fn test_parse_metadata_from_apollo_state() {
        let metadata = parse_metadata(WORK_PAGE, "1177354054").unwrap();
        assert_eq!(metadata.title, "転生したら");
        assert_eq!(metadata.introduction, "紹介文");
        assert_eq!(metadata.authors[0].name, "作者名");
        assert_eq!(
            metadata.authors[0].link.as_deref(),
            Some("https://kakuyomu.jp/users/writer9")
        );
        assert_eq!(
            metadata.toc,
            vec![
                TocItem::chapter("序", "100"),
                TocItem::heading("第二章"),
                TocItem::chapter("一", "101"),
                TocItem::chapter("二", "102"),
            ]
        );
    }

    #[test]
    fn test_missing_work_is_not_found() {
        assert!(matches!(
            parse_metadata(WORK_PAGE, "42"),
            Err(ProviderError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_chapter() {
        let html = r#"<html><body>
<p class="widget-episodeTitle">第1話</p>
<div class="widget-episodeBody js-episode-body">
  <p id="p1">　目を覚ました。</p>
  <p id="p2" class="blank"><br /></p>
  <p id="p3">「ここは？」</p>
</div></body></html>"#;
        let chapter = parse_chapter(html, "1177354054", "100").unwrap();
        assert_eq!(chapter.title(), Some("第1話"));
        assert_eq!(chapter.paragraph_count(), 3);
        assert!(chapter.paragraphs()[1].is_blank());
    }
}
