//! アルファポリス (www.alphapolis.co.jp)
//!
//! 组合标识为 `alphapolis-{作者ID}-{作品ID}`，book_id 是作者 ID，
//! 唯一的子标识是作品 ID。正文以 `<br>` 分行。

use async_trait::async_trait;
use scraper::Html;

use super::html::{br_lines, select_first, select_text, selector};
use super::SourceHttpClient;
use crate::application::ports::{NovelProviderPort, ProviderError};
use crate::domain::novel::{Author, Chapter, Metadata, TocItem};

const BASE_URL: &str = "https://www.alphapolis.co.jp";

pub struct AlphapolisProvider {
    client: SourceHttpClient,
}

impl AlphapolisProvider {
    pub const SOURCE_KEY: &'static str = "alphapolis";

    pub fn new(client: SourceHttpClient) -> Self {
        Self { client }
    }

    fn novel_url(author_id: &str, sub_ids: &[String]) -> Result<String, ProviderError> {
        let novel_id = sub_ids
            .first()
            .ok_or_else(|| ProviderError::NotFound(format!("alphapolis novel of {}", author_id)))?;
        Ok(format!("{}/novel/{}/{}", BASE_URL, author_id, novel_id))
    }
}

#[async_trait]
impl NovelProviderPort for AlphapolisProvider {
    fn source_key(&self) -> &'static str {
        Self::SOURCE_KEY
    }

    fn sub_id_arity(&self) -> usize {
        1
    }

    async fn fetch_metadata(
        &self,
        book_id: &str,
        sub_ids: &[String],
    ) -> Result<Metadata, ProviderError> {
        let url = Self::novel_url(book_id, sub_ids)?;
        let html = self.client.get_text(&url).await?;
        parse_metadata(&html, book_id)
    }

    async fn fetch_chapter(
        &self,
        book_id: &str,
        sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError> {
        let url = format!("{}/episode/{}", Self::novel_url(book_id, sub_ids)?, chapter_id);
        let html = self.client.get_text(&url).await?;
        parse_chapter(&html, book_id, sub_ids, chapter_id)
    }
}

fn parse_metadata(html: &str, author_id: &str) -> Result<Metadata, ProviderError> {
    let document = Html::parse_document(html);

    let title = select_text(&document, "h1.title")?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::parse("alphapolis: missing novel title"))?;

    let author = Author {
        name: select_text(&document, "div.author a")?.unwrap_or_default(),
        link: Some(format!("{}/author/detail/{}", BASE_URL, author_id)),
    };

    let introduction = select_text(&document, "div.abstract")?.unwrap_or_default();

    let mut toc = Vec::new();
    for item in document.select(&selector("div.episodes h3, div.episodes div.episode a")?) {
        if item.value().name() == "h3" {
            toc.push(TocItem::heading(item.text().collect::<String>().trim()));
            continue;
        }

        let Some(episode_id) = item
            .value()
            .attr("href")
            .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
        else {
            continue;
        };
        let title = item
            .select(&selector("span.title")?)
            .next()
            .map(|t| t.text().collect::<String>())
            .unwrap_or_else(|| item.text().collect::<String>());
        toc.push(TocItem::chapter(title.trim(), episode_id));
    }

    Ok(Metadata {
        title,
        authors: vec![author],
        introduction,
        toc,
    })
}

fn parse_chapter(
    html: &str,
    author_id: &str,
    sub_ids: &[String],
    chapter_id: &str,
) -> Result<Chapter, ProviderError> {
    let document = Html::parse_document(html);

    let body = select_first(&document, "#novelBody")?
        .ok_or_else(|| ProviderError::parse("alphapolis: missing #novelBody"))?;
    let lines = br_lines(body);

    let title = select_text(&document, "h2.episode-title")?.unwrap_or_default();

    Ok(Chapter::new(
        AlphapolisProvider::SOURCE_KEY,
        author_id,
        sub_ids.to_vec(),
        chapter_id,
        lines,
    )
    .with_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOVEL_PAGE: &str = r#"<html><body>
<div class="content-main">
  <h1 class="title">今までの功績を改竄され</h1>
  <div class="author"><a href="/author/detail/638978238">taki210</a></div>
  <div class="abstract">「今日限りでお前をこの<br>
  っていたのだった。</div>
  <div class="episodes">
    <h3>第一章</h3>
    <div class="episode "><a href="/novel/638978238/525733370/episode/6857738"><span class="title">第一話</span><span class="open-date">2022.01.01</span></a></div>
    <div class="episode "><a href="/novel/638978238/525733370/episode/6857739"><span class="title">第二話</span></a></div>
  </div>
</div></body></html>"#;

    #[test]
    fn test_parse_metadata() {
        let metadata = parse_metadata(NOVEL_PAGE, "638978238").unwrap();
        assert!(metadata.title.starts_with("今までの功績を改竄され"));
        assert_eq!(metadata.authors[0].name, "taki210");
        assert_eq!(
            metadata.authors[0].link.as_deref(),
            Some("https://www.alphapolis.co.jp/author/detail/638978238")
        );
        assert!(metadata.introduction.starts_with("「今日限りでお前をこの"));
        assert!(metadata.introduction.ends_with("っていたのだった。"));
        assert_eq!(metadata.toc[0], TocItem::heading("第一章"));
        assert_eq!(metadata.toc[1], TocItem::chapter("第一話", "6857738"));
        assert_eq!(metadata.chapter_count(), 2);
    }

    #[test]
    fn test_parse_chapter_splits_on_br() {
        let html = r#"<html><body>
<h2 class="episode-title">第二話</h2>
<div id="novelBody">
　ある日のこと。<br />
<br />
　彼は旅に出た。<br />
</div></body></html>"#;
        let sub_ids = vec!["525733370".to_string()];
        let chapter = parse_chapter(html, "638978238", &sub_ids, "6857739").unwrap();

        let texts: Vec<_> = chapter.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["　ある日のこと。", "", "　彼は旅に出た。"]);
        assert_eq!(chapter.book_key(), "638978238-525733370");
        assert_eq!(chapter.title(), Some("第二話"));
    }

    #[test]
    fn test_missing_body_is_parse_error() {
        let sub_ids = vec!["1".to_string()];
        assert!(matches!(
            parse_chapter("<html></html>", "1", &sub_ids, "1"),
            Err(ProviderError::ParseError(_))
        ));
    }
}
