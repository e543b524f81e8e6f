use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::{Bookmark, BookmarkInfo, NewBookmark};
use crate::db::Database;

/// Data access for bookmarks. Absence is reported as `None` (or `false` for
/// deletes); `Err` is reserved for backend failures.
#[async_trait]
pub trait BookmarkStore: Send + Sync + 'static {
    /// Every bookmark, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Bookmark>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>>;

    async fn find_info_by_id(&self, id: i64) -> Result<Option<BookmarkInfo>>;

    /// Persists a new bookmark and returns it with its generated id.
    async fn insert(&self, new: NewBookmark) -> Result<Bookmark>;

    /// Writes `title`, `url` and `updated_at` of an existing bookmark.
    /// Returns `None` when the row no longer exists.
    async fn save(&self, bookmark: &Bookmark) -> Result<Option<Bookmark>>;

    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    async fn delete(&self, bookmark: &Bookmark) -> Result<bool> {
        self.delete_by_id(bookmark.id).await
    }
}

const SQL_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn to_sql_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(SQL_TIMESTAMP).to_string()
}

fn parse_sql_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow::anyhow!("invalid timestamp {raw:?} in bookmarks: {e}"))?;
    Ok(ts.with_timezone(&Utc))
}

pub struct LibsqlBookmarkStore {
    db: Arc<Database>,
}

impl LibsqlBookmarkStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        let created_at: String = row.get(3)?;
        let updated_at: Option<String> = row.get(4)?;

        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            created_at: parse_sql_timestamp(&created_at)?,
            updated_at: updated_at.as_deref().map(parse_sql_timestamp).transpose()?,
        })
    }

    fn row_to_info(row: &libsql::Row) -> Result<BookmarkInfo> {
        let created_at: String = row.get(3)?;

        Ok(BookmarkInfo {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            created_at: parse_sql_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl BookmarkStore for LibsqlBookmarkStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, title, url, created_at, updated_at
            FROM bookmarks
            ORDER BY created_at DESC, id DESC
        "#;

        let mut rows = self.db.connection().query(query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, title, url, created_at, updated_at
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.db.connection().query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn find_info_by_id(&self, id: i64) -> Result<Option<BookmarkInfo>> {
        let query = r#"
            SELECT id, title, url, created_at
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.db.connection().query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_info(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn insert(&self, new: NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (title, url, created_at)
            VALUES (?, ?, COALESCE(?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))
            RETURNING id, title, url, created_at, updated_at
        "#;

        let created_at = new.created_at.as_ref().map(to_sql_timestamp);
        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![new.title, new.url, created_at])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Self::row_to_bookmark(&row)?)
        } else {
            anyhow::bail!("Failed to create bookmark")
        }
    }

    async fn save(&self, bookmark: &Bookmark) -> Result<Option<Bookmark>> {
        let query = r#"
            UPDATE bookmarks
            SET title = ?, url = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, title, url, created_at, updated_at
        "#;

        let updated_at = bookmark.updated_at.as_ref().map(to_sql_timestamp);
        let mut rows = self
            .db
            .connection()
            .query(
                query,
                libsql::params![
                    bookmark.title.clone(),
                    bookmark.url.clone(),
                    updated_at,
                    bookmark.id
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = self
            .db
            .connection()
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(result > 0)
    }
}
