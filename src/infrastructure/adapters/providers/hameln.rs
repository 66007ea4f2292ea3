//! ハーメルン (syosetu.org)

use async_trait::async_trait;
use scraper::Html;

use super::html::{element_text, paragraph_lines, select_text, selector};
use super::SourceHttpClient;
use crate::application::ports::{NovelProviderPort, ProviderError};
use crate::domain::novel::{Author, Chapter, Metadata, TocItem};

const BASE_URL: &str = "https://syosetu.org";

/// 跳过年龄确认页
const AGE_COOKIE: &str = "over18=off";

pub struct HamelnProvider {
    client: SourceHttpClient,
}

impl HamelnProvider {
    pub const SOURCE_KEY: &'static str = "hameln";

    pub fn new(client: SourceHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NovelProviderPort for HamelnProvider {
    fn source_key(&self) -> &'static str {
        Self::SOURCE_KEY
    }

    async fn fetch_metadata(
        &self,
        book_id: &str,
        _sub_ids: &[String],
    ) -> Result<Metadata, ProviderError> {
        let url = format!("{}/novel/{}/", BASE_URL, book_id);
        let html = self.client.get_text_with_cookie(&url, Some(AGE_COOKIE)).await?;
        parse_metadata(&html)
    }

    async fn fetch_chapter(
        &self,
        book_id: &str,
        _sub_ids: &[String],
        chapter_id: &str,
    ) -> Result<Chapter, ProviderError> {
        let url = format!("{}/novel/{}/{}.html", BASE_URL, book_id, chapter_id);
        let html = self.client.get_text_with_cookie(&url, Some(AGE_COOKIE)).await?;
        parse_chapter(&html, book_id, chapter_id)
    }
}

fn parse_metadata(html: &str) -> Result<Metadata, ProviderError> {
    let document = Html::parse_document(html);

    let title = select_text(&document, r#"span[itemprop="name"]"#)?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::parse("hameln: missing novel title"))?;

    let author_link = document
        .select(&selector(r#"span[itemprop="author"] a"#)?)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| {
            if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", BASE_URL, href)
            }
        });
    let author = Author {
        name: select_text(&document, r#"span[itemprop="author"]"#)?.unwrap_or_default(),
        link: author_link,
    };

    // 第一个 .ss 是标题栏，第二个是简介
    let introduction = document
        .select(&selector("#maind > div.ss")?)
        .nth(1)
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default();

    let mut toc = Vec::new();
    for row in document.select(&selector("#maind table tr")?) {
        if let Some(heading) = row.select(&selector("td[colspan] strong")?).next() {
            toc.push(TocItem::heading(heading.text().collect::<String>().trim()));
            continue;
        }

        let Some(link) = row.select(&selector(r#"a[href$=".html"]"#)?).next() else {
            continue;
        };
        let chapter_id = link
            .value()
            .attr("href")
            .and_then(|href| href.rsplit('/').next())
            .and_then(|file| file.strip_suffix(".html"));
        if let Some(chapter_id) = chapter_id {
            toc.push(TocItem::chapter(link.text().collect::<String>().trim(), chapter_id));
        }
    }

    Ok(Metadata {
        title,
        authors: vec![author],
        introduction,
        toc,
    })
}

fn parse_chapter(html: &str, book_id: &str, chapter_id: &str) -> Result<Chapter, ProviderError> {
    let document = Html::parse_document(html);

    let lines = paragraph_lines(&document, "#honbun p")?;
    if lines.is_empty() {
        return Err(ProviderError::parse("hameln: missing #honbun"));
    }

    let title = select_text(&document, r#"#maind span[style*="font-size:120%"]"#)?.unwrap_or_default();

    Ok(Chapter::new(
        HamelnProvider::SOURCE_KEY,
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

    #[test]
    fn test_parse_metadata() {
        let html = r#"<html><body><div id="maind">
<div class="ss"><span itemprop="name">二次創作</span>
  作：<span itemprop="author"><a href="/user/42/">書き手</a></span></div>
<div class="ss">あらすじ<br>二行目</div>
<div class="ss"><table>
  <tr><td colspan="2"><strong>第一部</strong></td></tr>
  <tr><td><a href="./1.html" style="text-decoration:none;">始まり</a></td><td>2020/01/01</td></tr>
  <tr><td><a href="./2.html">続き</a></td></tr>
</table></div>
</div></body></html>"#;

        let metadata = parse_metadata(html).unwrap();
        assert_eq!(metadata.title, "二次創作");
        assert_eq!(metadata.authors[0].name, "書き手");
        assert_eq!(
            metadata.authors[0].link.as_deref(),
            Some("https://syosetu.org/user/42/")
        );
        assert_eq!(metadata.introduction, "あらすじ\n二行目");
        assert_eq!(
            metadata.toc,
            vec![
                TocItem::heading("第一部"),
                TocItem::chapter("始まり", "1"),
                TocItem::chapter("続き", "2"),
            ]
        );
    }

    #[test]
    fn test_parse_chapter() {
        let html = r#"<html><body><div id="maind"><div class="ss">
<span style="font-size:120%">始まり</span>
<div id="honbun"><p id="1">　静かな夜。</p><p id="2"></p><p id="3">　月が出た。</p></div>
</div></div></body></html>"#;
        let chapter = parse_chapter(html, "12345", "1").unwrap();
        assert_eq!(chapter.title(), Some("始まり"));
        let texts: Vec<_> = chapter.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["　静かな夜。", "", "　月が出た。"]);
    }
}
