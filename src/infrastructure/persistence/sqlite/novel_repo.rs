//! SQLite Web Novel Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{NovelSummary, RepositoryError, WebNovelRepositoryPort};

/// SQLite Web Novel Repository
pub struct SqliteWebNovelRepository {
    pool: DbPool,
}

impl SqliteWebNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelSummaryRow {
    novel_id: String,
    title: String,
    authors: String,
    total_chapters: i64,
    updated_at: String,
}

impl TryFrom<NovelSummaryRow> for NovelSummary {
    type Error = RepositoryError;

    fn try_from(row: NovelSummaryRow) -> Result<Self, Self::Error> {
        Ok(NovelSummary {
            novel_id: row.novel_id,
            title: row.title,
            authors: decode_authors(&row.authors)?,
            total_chapters: row.total_chapters.max(0) as usize,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// 作者列表以 JSON 数组存储
pub(super) fn decode_authors(raw: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(raw).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[async_trait]
impl WebNovelRepositoryPort for SqliteWebNovelRepository {
    async fn upsert_summary(&self, summary: &NovelSummary) -> Result<(), RepositoryError> {
        let authors = serde_json::to_string(&summary.authors)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO web_novels (novel_id, title, authors, total_chapters, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(novel_id) DO UPDATE SET
                title = excluded.title,
                authors = excluded.authors,
                total_chapters = excluded.total_chapters,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&summary.novel_id)
        .bind(&summary.title)
        .bind(authors)
        .bind(summary.total_chapters as i64)
        .bind(summary.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_summary(&self, novel_id: &str) -> Result<Option<NovelSummary>, RepositoryError> {
        let row: Option<NovelSummaryRow> = sqlx::query_as(
            "SELECT novel_id, title, authors, total_chapters, updated_at FROM web_novels WHERE novel_id = ?",
        )
        .bind(novel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(NovelSummary::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn setup() -> SqliteWebNovelRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteWebNovelRepository::new(pool)
    }

    fn summary(title: &str, chapters: usize) -> NovelSummary {
        NovelSummary {
            novel_id: "syosetu-n1234ab".to_string(),
            title: title.to_string(),
            authors: vec!["山田".to_string()],
            total_chapters: chapters,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let repo = setup().await;
        assert!(repo.find_summary("syosetu-n1234ab").await.unwrap().is_none());

        repo.upsert_summary(&summary("旧題", 10)).await.unwrap();
        repo.upsert_summary(&summary("新題", 12)).await.unwrap();

        let found = repo.find_summary("syosetu-n1234ab").await.unwrap().unwrap();
        assert_eq!(found.title, "新題");
        assert_eq!(found.total_chapters, 12);
        assert_eq!(found.authors, vec!["山田".to_string()]);
    }
}
