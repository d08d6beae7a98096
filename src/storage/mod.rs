//! Analysis persistence


use crate::error::{AnalyzerError, Result};
use crate::types::{RawComment, ScoredComment, SentimentRecord, VideoRecord};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use uuid::Uuid;

/// Storage used to keep analyses between runs
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert or refresh a video row keyed by id
    async fn upsert_video(&self, video_id: &str, title: &str, link: &str) -> Result<()>;

    /// Insert comments in order, returning their generated ids in the same order
    async fn insert_comments(&self, video_id: &str, comments: &[RawComment]) -> Result<Vec<String>>;

    async fn insert_sentiments(&self, records: &[SentimentRecord]) -> Result<()>;

    /// Remove every comment and sentiment row for a video
    async fn delete_comments_for_video(&self, video_id: &str) -> Result<()>;

    /// Upsert the video and swap its comments and sentiments for `comments`
    /// in one transaction. Returns the number of comments written.
    async fn replace_analysis(
        &self,
        video_id: &str,
        title: &str,
        link: &str,
        comments: &[ScoredComment],
    ) -> Result<usize>;

    /// Previously analyzed videos, most recent first
    async fn list_videos(&self) -> Result<Vec<VideoRecord>>;
}

/// SQLite-backed analysis store
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to SQLite database (creates if not exists)
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", path.as_ref().display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;

        tracing::debug!(path = %path.as_ref().display(), "Opened analysis database");
        Ok(store)
    }

    /// Private in-memory database, one connection so every query sees the same data
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                video_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                video_id TEXT NOT NULL REFERENCES videos(video_id),
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                likes INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sentiments (
                comment_id TEXT PRIMARY KEY REFERENCES comments(id) ON DELETE CASCADE,
                label TEXT NOT NULL,
                score REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_video ON comments(video_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Comments stored for a video, in insertion order
    pub async fn comments_for_video(&self, video_id: &str) -> Result<Vec<(String, RawComment)>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, text, likes
            FROM comments
            WHERE video_id = ?
            ORDER BY position
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.id, RawComment::new(r.text, r.likes.max(0) as u64)))
            .collect())
    }

    /// Sentiment rows stored for a video, in comment order
    pub async fn sentiments_for_video(&self, video_id: &str) -> Result<Vec<SentimentRecord>> {
        let rows = sqlx::query_as::<_, SentimentRow>(
            r#"
            SELECT s.comment_id, s.label, s.score
            FROM sentiments s
            JOIN comments c ON c.id = s.comment_id
            WHERE c.video_id = ?
            ORDER BY c.position
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SentimentRecord::try_from).collect()
    }
}

#[async_trait]
impl AnalysisStore for SqliteStore {
    async fn upsert_video(&self, video_id: &str, title: &str, link: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        write_video(&mut conn, video_id, title, link).await
    }

    async fn insert_comments(&self, video_id: &str, comments: &[RawComment]) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;
        let ids = write_comments(&mut tx, video_id, comments).await?;
        tx.commit().await?;

        tracing::debug!(video_id, count = ids.len(), "Inserted comments");
        Ok(ids)
    }

    async fn insert_sentiments(&self, records: &[SentimentRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        write_sentiments(&mut tx, records).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_comments_for_video(&self, video_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let deleted = clear_comments(&mut tx, video_id).await?;
        tx.commit().await?;

        tracing::debug!(video_id, deleted, "Cleared previous comments");
        Ok(())
    }

    async fn replace_analysis(
        &self,
        video_id: &str,
        title: &str,
        link: &str,
        comments: &[ScoredComment],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        write_video(&mut tx, video_id, title, link).await?;
        let deleted = clear_comments(&mut tx, video_id).await?;

        let raw: Vec<RawComment> = comments.iter().map(|s| s.comment.clone()).collect();
        let ids = write_comments(&mut tx, video_id, &raw).await?;

        let records: Vec<SentimentRecord> = ids
            .into_iter()
            .zip(comments)
            .map(|(comment_id, scored)| SentimentRecord {
                comment_id,
                label: scored.class(),
                score: scored.score,
            })
            .collect();
        write_sentiments(&mut tx, &records).await?;

        // Dropping `tx` on any error above rolls everything back
        tx.commit().await?;

        tracing::debug!(video_id, deleted, written = records.len(), "Replaced analysis");
        Ok(records.len())
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT video_id, title, link, analyzed_at
            FROM videos
            ORDER BY analyzed_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VideoRecord::try_from).collect()
    }
}

async fn write_video(conn: &mut SqliteConnection, video_id: &str, title: &str, link: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO videos (video_id, title, link, analyzed_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(video_id) DO UPDATE SET
            title = excluded.title,
            link = excluded.link,
            analyzed_at = excluded.analyzed_at
        "#,
    )
    .bind(video_id)
    .bind(title)
    .bind(link)
    .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn write_comments(
    conn: &mut SqliteConnection,
    video_id: &str,
    comments: &[RawComment],
) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(comments.len());

    for (position, comment) in comments.iter().enumerate() {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO comments (id, video_id, position, text, likes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(video_id)
        .bind(position as i64)
        .bind(&comment.text)
        .bind(i64::try_from(comment.engagement).unwrap_or(i64::MAX))
        .execute(&mut *conn)
        .await?;
        ids.push(id);
    }

    Ok(ids)
}

async fn write_sentiments(conn: &mut SqliteConnection, records: &[SentimentRecord]) -> Result<()> {
    for record in records {
        sqlx::query(
            r#"
            INSERT INTO sentiments (comment_id, label, score)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.comment_id)
        .bind(record.label.as_str())
        .bind(record.score)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Returns the number of comment rows removed
async fn clear_comments(conn: &mut SqliteConnection, video_id: &str) -> Result<u64> {
    sqlx::query(
        r#"
        DELETE FROM sentiments
        WHERE comment_id IN (SELECT id FROM comments WHERE video_id = ?)
        "#,
    )
    .bind(video_id)
    .execute(&mut *conn)
    .await?;

    let deleted = sqlx::query("DELETE FROM comments WHERE video_id = ?")
        .bind(video_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(deleted)
}

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    video_id: String,
    title: String,
    link: String,
    analyzed_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: String,
    text: String,
    likes: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SentimentRow {
    comment_id: String,
    label: String,
    score: f64,
}

impl TryFrom<VideoRow> for VideoRecord {
    type Error = AnalyzerError;

    fn try_from(row: VideoRow) -> Result<Self> {
        let analyzed_at = chrono::DateTime::parse_from_rfc3339(&row.analyzed_at)
            .map_err(|e| AnalyzerError::Internal(format!("bad timestamp {}: {}", row.analyzed_at, e)))?
            .with_timezone(&Utc);

        Ok(VideoRecord {
            video_id: row.video_id,
            title: row.title,
            link: row.link,
            analyzed_at,
        })
    }
}

impl TryFrom<SentimentRow> for SentimentRecord {
    type Error = AnalyzerError;

    fn try_from(row: SentimentRow) -> Result<Self> {
        Ok(SentimentRecord {
            comment_id: row.comment_id,
            label: row.label.parse().map_err(AnalyzerError::Internal)?,
            score: row.score,
        })
    }
}
