use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

pub const TITLE_MAX_LEN: usize = 200;
pub const URL_MAX_LEN: usize = 500;

/// Current time at the precision the store keeps (milliseconds).
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// Returns the record with `title` and `url` replaced and `updated_at`
    /// stamped. Identity and creation time carry over unchanged.
    pub fn revise(self, changes: ValidBookmark, at: DateTime<Utc>) -> Bookmark {
        let updated_at = at.max(self.created_at);
        Bookmark {
            title: changes.title,
            url: changes.url,
            updated_at: Some(updated_at),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkInfo {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Bookmark> for BookmarkInfo {
    fn from(b: Bookmark) -> Self {
        BookmarkInfo {
            id: b.id,
            title: b.title,
            url: b.url,
            created_at: b.created_at,
        }
    }
}

/// Insert input. Leaving `created_at` empty lets the store stamp it.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewBookmark {
    pub fn new(changes: ValidBookmark, created_at: DateTime<Utc>) -> Self {
        NewBookmark {
            title: changes.title,
            url: changes.url,
            created_at: Some(created_at),
        }
    }
}

/// Request body for both create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBookmark {
    pub title: String,
    pub url: String,
}

impl BookmarkPayload {
    pub fn validate(self) -> Result<ValidBookmark, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.title.is_empty() {
            errors.add("title", "Title is required");
        } else if self.title.chars().count() > TITLE_MAX_LEN {
            errors.add("title", format!("Title must be at most {TITLE_MAX_LEN} characters"));
        }

        if self.url.is_empty() {
            errors.add("url", "Url is required");
        } else if self.url.chars().count() > URL_MAX_LEN {
            errors.add("url", format!("Url must be at most {URL_MAX_LEN} characters"));
        }

        if errors.is_empty() {
            Ok(ValidBookmark {
                title: self.title,
                url: self.url,
            })
        } else {
            Err(errors)
        }
    }
}
