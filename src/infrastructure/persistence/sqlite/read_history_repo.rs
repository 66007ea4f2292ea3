//! SQLite Read History Repository
//!
//! read_at 以定宽 RFC3339（微秒，UTC）存储，字符串顺序即时间顺序

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::novel_repo::{decode_authors, parse_timestamp};
use super::DbPool;
use crate::application::ports::{
    NovelSummary, Page, ReadHistoryItem, ReadHistoryRecord, ReadHistoryRepositoryPort,
    RepositoryError,
};

/// SQLite Read History Repository
pub struct SqliteReadHistoryRepository {
    pool: DbPool,
}

impl SqliteReadHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 以指定时间记录阅读
    pub async fn record_chapter_read_at(
        &self,
        user_id: &str,
        novel_id: &str,
        chapter_id: &str,
        read_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO read_history (id, user_id, novel_id, chapter_id, read_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, novel_id) DO UPDATE SET
                chapter_id = excluded.chapter_id,
                read_at = excluded.read_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(novel_id)
        .bind(chapter_id)
        .bind(format_timestamp(read_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(FromRow)]
struct ReadHistoryRow {
    user_id: String,
    novel_id: String,
    chapter_id: String,
    read_at: String,
}

impl TryFrom<ReadHistoryRow> for ReadHistoryRecord {
    type Error = RepositoryError;

    fn try_from(row: ReadHistoryRow) -> Result<Self, Self::Error> {
        Ok(ReadHistoryRecord {
            user_id: row.user_id,
            novel_id: row.novel_id,
            chapter_id: row.chapter_id,
            read_at: parse_timestamp(&row.read_at)?,
        })
    }
}

/// 列表行，小说摘要可能尚未写入
#[derive(FromRow)]
struct ReadHistoryItemRow {
    novel_id: String,
    chapter_id: String,
    read_at: String,
    title: Option<String>,
    authors: Option<String>,
    total_chapters: Option<i64>,
    updated_at: Option<String>,
}

impl TryFrom<ReadHistoryItemRow> for ReadHistoryItem {
    type Error = RepositoryError;

    fn try_from(row: ReadHistoryItemRow) -> Result<Self, Self::Error> {
        let last_read_at = parse_timestamp(&row.read_at)?;

        // 没有摘要时以 novel_id 作标题占位
        let novel = NovelSummary {
            title: row.title.unwrap_or_else(|| row.novel_id.clone()),
            authors: row.authors.as_deref().map(decode_authors).transpose()?.unwrap_or_default(),
            total_chapters: row.total_chapters.unwrap_or(0).max(0) as usize,
            updated_at: row
                .updated_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?
                .unwrap_or(last_read_at),
            novel_id: row.novel_id,
        };

        Ok(ReadHistoryItem {
            novel,
            chapter_id: row.chapter_id,
            last_read_at,
        })
    }
}

#[async_trait]
impl ReadHistoryRepositoryPort for SqliteReadHistoryRepository {
    async fn record_chapter_read(
        &self,
        user_id: &str,
        novel_id: &str,
        chapter_id: &str,
    ) -> Result<(), RepositoryError> {
        self.record_chapter_read_at(user_id, novel_id, chapter_id, Utc::now())
            .await
    }

    async fn find(
        &self,
        user_id: &str,
        novel_id: &str,
    ) -> Result<Option<ReadHistoryRecord>, RepositoryError> {
        let row: Option<ReadHistoryRow> = sqlx::query_as(
            "SELECT user_id, novel_id, chapter_id, read_at FROM read_history WHERE user_id = ? AND novel_id = ?",
        )
        .bind(user_id)
        .bind(novel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ReadHistoryRecord::try_from).transpose()
    }

    async fn list_read_history(
        &self,
        user_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page<ReadHistoryItem>, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM read_history WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        // 偏移量溢出 i64 时必然越过末尾
        let offset = page
            .checked_mul(page_size)
            .and_then(|offset| i64::try_from(offset).ok());
        let limit = i64::try_from(page_size).ok();
        let (offset, limit) = match (offset, limit) {
            (Some(offset), Some(limit)) if limit > 0 && offset < total => (offset, limit),
            _ => {
                return Ok(Page {
                    items: Vec::new(),
                    total: total.max(0) as u64,
                    page_size,
                })
            }
        };

        let rows: Vec<ReadHistoryItemRow> = sqlx::query_as(
            r#"
            SELECT h.novel_id, h.chapter_id, h.read_at,
                   n.title, n.authors, n.total_chapters, n.updated_at
            FROM read_history h
            LEFT JOIN web_novels n ON n.novel_id = h.novel_id
            WHERE h.user_id = ?
            ORDER BY h.read_at DESC, h.novel_id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(ReadHistoryItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total as u64,
            page_size,
        })
    }

    async fn delete_read_history_entry(
        &self,
        user_id: &str,
        novel_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM read_history WHERE user_id = ? AND novel_id = ?")
            .bind(user_id)
            .bind(novel_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_all_read_history(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM read_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::WebNovelRepositoryPort;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteWebNovelRepository,
    };
    use chrono::{Duration, TimeZone};

    async fn setup() -> (SqliteReadHistoryRepository, SqliteWebNovelRepository) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (
            SqliteReadHistoryRepository::new(pool.clone()),
            SqliteWebNovelRepository::new(pool),
        )
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[tokio::test]
    async fn test_record_is_idempotent_upsert() {
        let (repo, _) = setup().await;

        repo.record_chapter_read_at("u1", "syosetu-n1", "1", at(0)).await.unwrap();
        repo.record_chapter_read_at("u1", "syosetu-n1", "5", at(3)).await.unwrap();

        let record = repo.find("u1", "syosetu-n1").await.unwrap().unwrap();
        assert_eq!(record.chapter_id, "5");
        assert_eq!(record.read_at, at(3));

        let page = repo.list_read_history("u1", 0, 10).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first_and_paged() {
        let (repo, novels) = setup().await;
        novels
            .upsert_summary(&NovelSummary {
                novel_id: "kakuyomu-1".to_string(),
                title: "カクヨム作品".to_string(),
                authors: vec!["a".to_string()],
                total_chapters: 7,
                updated_at: at(0),
            })
            .await
            .unwrap();

        repo.record_chapter_read_at("u1", "syosetu-n1", "1", at(1)).await.unwrap();
        repo.record_chapter_read_at("u1", "kakuyomu-1", "2", at(3)).await.unwrap();
        repo.record_chapter_read_at("u1", "hameln-9", "3", at(2)).await.unwrap();
        repo.record_chapter_read_at("u2", "syosetu-n1", "9", at(9)).await.unwrap();

        let first = repo.list_read_history("u1", 0, 2).await.unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.page_count(), 2);
        let ids: Vec<_> = first.items.iter().map(|i| i.novel.novel_id.as_str()).collect();
        assert_eq!(ids, vec!["kakuyomu-1", "hameln-9"]);
        assert_eq!(first.items[0].novel.title, "カクヨム作品");
        assert_eq!(first.items[0].novel.total_chapters, 7);
        // 无摘要时的占位
        assert_eq!(first.items[1].novel.title, "hameln-9");
        assert!(first.items[1].novel.authors.is_empty());

        let second = repo.list_read_history("u1", 1, 2).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].novel.novel_id, "syosetu-n1");
        assert_eq!(second.items[0].last_read_at, at(1));

        let beyond = repo.list_read_history("u1", 5, 2).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
    }

    #[tokio::test]
    async fn test_huge_page_is_empty_not_error() {
        let (repo, _) = setup().await;
        repo.record_chapter_read_at("u1", "syosetu-n1", "1", at(1)).await.unwrap();

        for page in [1usize << 62, usize::MAX] {
            let result = repo.list_read_history("u1", page, 100).await.unwrap();
            assert!(result.items.is_empty());
            assert_eq!(result.total, 1);
        }
    }

    #[tokio::test]
    async fn test_delete_entry_and_clear() {
        let (repo, _) = setup().await;
        repo.record_chapter_read_at("u1", "syosetu-n1", "1", at(1)).await.unwrap();
        repo.record_chapter_read_at("u1", "kakuyomu-1", "1", at(2)).await.unwrap();
        repo.record_chapter_read_at("u2", "kakuyomu-1", "1", at(2)).await.unwrap();

        repo.delete_read_history_entry("u1", "syosetu-n1").await.unwrap();
        assert!(repo.find("u1", "syosetu-n1").await.unwrap().is_none());
        // 删除不存在的条目不报错
        repo.delete_read_history_entry("u1", "syosetu-n1").await.unwrap();

        assert_eq!(repo.delete_all_read_history("u1").await.unwrap(), 1);
        assert_eq!(repo.list_read_history("u1", 0, 10).await.unwrap().total, 0);
        assert_eq!(repo.list_read_history("u2", 0, 10).await.unwrap().total, 1);
    }
}
