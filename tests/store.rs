use std::sync::Arc;

use bookmarks::bookmarks::{
    BookmarkStore, LibsqlBookmarkStore, MemoryBookmarkStore, NewBookmark, ValidBookmark,
    timestamp_now,
};
use bookmarks::db::Database;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

async fn libsql_store() -> (TempDir, LibsqlBookmarkStore) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("bookmarks.db")).await.unwrap();
    (dir, LibsqlBookmarkStore::new(Arc::new(db)))
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap()
}

fn new_bookmark(title: &str, created_at: Option<DateTime<Utc>>) -> NewBookmark {
    NewBookmark {
        title: title.to_string(),
        url: format!("https://{title}.example"),
        created_at,
    }
}

fn changes(title: &str, url: &str) -> ValidBookmark {
    ValidBookmark {
        title: title.to_string(),
        url: url.to_string(),
    }
}

async fn insert_assigns_increasing_ids(store: &dyn BookmarkStore) {
    let first = store.insert(new_bookmark("one", Some(at(0)))).await.unwrap();
    let second = store.insert(new_bookmark("two", Some(at(1)))).await.unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.title, "one");
    assert_eq!(first.url, "https://one.example");
    assert_eq!(first.created_at, at(0));
    assert_eq!(first.updated_at, None);
}

async fn insert_defaults_creation_time(store: &dyn BookmarkStore) {
    let before = timestamp_now();
    let saved = store.insert(new_bookmark("defaulted", None)).await.unwrap();
    let after = timestamp_now();

    assert!(saved.created_at >= before);
    assert!(saved.created_at <= after);
}

async fn list_is_newest_first(store: &dyn BookmarkStore) {
    assert!(store.list_all().await.unwrap().is_empty());

    store.insert(new_bookmark("middle", Some(at(10)))).await.unwrap();
    store.insert(new_bookmark("oldest", Some(at(5)))).await.unwrap();
    store.insert(new_bookmark("newest", Some(at(20)))).await.unwrap();

    let titles: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);

    // Same answer without intervening writes.
    assert_eq!(store.list_all().await.unwrap(), store.list_all().await.unwrap());
}

async fn list_breaks_creation_ties_by_id(store: &dyn BookmarkStore) {
    let earlier = store.insert(new_bookmark("earlier", Some(at(0)))).await.unwrap();
    let later = store.insert(new_bookmark("later", Some(at(0)))).await.unwrap();
    assert!(later.id > earlier.id);

    let ids: Vec<i64> = store.list_all().await.unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![later.id, earlier.id]);
}

async fn finds_by_id_and_projection(store: &dyn BookmarkStore) {
    let saved = store.insert(new_bookmark("find", Some(at(3)))).await.unwrap();

    let found = store.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(found, saved);

    let info = store.find_info_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(info.id, saved.id);
    assert_eq!(info.title, "find");
    assert_eq!(info.url, "https://find.example");
    assert_eq!(info.created_at, at(3));

    assert!(store.find_by_id(saved.id + 100).await.unwrap().is_none());
    assert!(store.find_info_by_id(saved.id + 100).await.unwrap().is_none());
}

async fn save_overwrites_fields(store: &dyn BookmarkStore) {
    let saved = store.insert(new_bookmark("draft", Some(at(0)))).await.unwrap();
    let revised = saved
        .clone()
        .revise(changes("final", "https://final.example"), at(30));

    let persisted = store.save(&revised).await.unwrap().unwrap();
    assert_eq!(persisted, revised);

    let reloaded = store.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(reloaded.id, saved.id);
    assert_eq!(reloaded.created_at, saved.created_at);
    assert_eq!(reloaded.title, "final");
    assert_eq!(reloaded.url, "https://final.example");
    assert_eq!(reloaded.updated_at, Some(at(30)));
}

async fn save_of_missing_row_is_none(store: &dyn BookmarkStore) {
    let saved = store.insert(new_bookmark("gone", Some(at(0)))).await.unwrap();
    assert!(store.delete_by_id(saved.id).await.unwrap());

    let revised = saved.revise(changes("ghost", "https://ghost.example"), at(1));
    assert!(store.save(&revised).await.unwrap().is_none());
}

async fn delete_is_terminal(store: &dyn BookmarkStore) {
    let keep = store.insert(new_bookmark("keep", Some(at(0)))).await.unwrap();
    let removed = store.insert(new_bookmark("removed", Some(at(1)))).await.unwrap();

    assert!(store.delete(&removed).await.unwrap());
    assert!(store.find_by_id(removed.id).await.unwrap().is_none());
    assert!(!store.delete_by_id(removed.id).await.unwrap());

    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining, vec![keep]);
}

async fn ids_are_not_reused(store: &dyn BookmarkStore) {
    let first = store.insert(new_bookmark("first", Some(at(0)))).await.unwrap();
    store.delete_by_id(first.id).await.unwrap();
    let second = store.insert(new_bookmark("second", Some(at(1)))).await.unwrap();
    assert!(second.id > first.id);
}

macro_rules! store_contract {
    ($($name:ident),* $(,)?) => {
        mod libsql {
            $(
                #[tokio::test]
                async fn $name() {
                    let (_dir, store) = super::libsql_store().await;
                    super::$name(&store).await;
                }
            )*
        }

        mod memory {
            $(
                #[tokio::test]
                async fn $name() {
                    let store = bookmarks::bookmarks::MemoryBookmarkStore::new();
                    super::$name(&store).await;
                }
            )*
        }
    };
}

store_contract!(
    insert_assigns_increasing_ids,
    insert_defaults_creation_time,
    list_is_newest_first,
    list_breaks_creation_ties_by_id,
    finds_by_id_and_projection,
    save_overwrites_fields,
    save_of_missing_row_is_none,
    delete_is_terminal,
    ids_are_not_reused,
);

#[tokio::test]
async fn libsql_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookmarks.db");

    let id = {
        let db = Database::open(&path).await.unwrap();
        let store = LibsqlBookmarkStore::new(Arc::new(db));
        store.insert(new_bookmark("durable", Some(at(0)))).await.unwrap().id
    };

    let db = Database::open(&path).await.unwrap();
    let store = LibsqlBookmarkStore::new(Arc::new(db));
    let found = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.title, "durable");
}

#[tokio::test]
async fn memory_store_shares_state_across_clones_of_app_state() {
    let state = bookmarks::handler::AppState::new(MemoryBookmarkStore::new());
    let other = state.clone();

    state
        .store
        .insert(new_bookmark("shared", Some(at(0) + Duration::seconds(1))))
        .await
        .unwrap();
    assert_eq!(other.store.list_all().await.unwrap().len(), 1);
}
