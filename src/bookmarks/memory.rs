use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::timestamp_now;
use super::{Bookmark, BookmarkInfo, BookmarkStore, NewBookmark};

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Bookmark>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryBookmarkStore {
    inner: RwLock<Inner>,
}

impl MemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarkStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let inner = self.inner.read().await;
        let mut bookmarks: Vec<Bookmark> = inner.rows.values().cloned().collect();
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookmarks)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_info_by_id(&self, id: i64) -> Result<Option<BookmarkInfo>> {
        Ok(self.find_by_id(id).await?.map(BookmarkInfo::from))
    }

    async fn insert(&self, new: NewBookmark) -> Result<Bookmark> {
        let mut inner = self.inner.write().await;
        // Ids are never reused, matching AUTOINCREMENT.
        inner.last_id += 1;
        let bookmark = Bookmark {
            id: inner.last_id,
            title: new.title,
            url: new.url,
            created_at: new.created_at.unwrap_or_else(timestamp_now),
            updated_at: None,
        };
        inner.rows.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    async fn save(&self, bookmark: &Bookmark) -> Result<Option<Bookmark>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.rows.get_mut(&bookmark.id) else {
            return Ok(None);
        };

        existing.title = bookmark.title.clone();
        existing.url = bookmark.url.clone();
        existing.updated_at = bookmark.updated_at;
        Ok(Some(existing.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
