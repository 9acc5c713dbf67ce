//! Entity types exchanged with the content store.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Post type used when a lookup or insert does not name one.
pub const DEFAULT_POST_TYPE: &str = "post";

/// Status given to entries inserted without one.
pub const DEFAULT_POST_STATUS: &str = "draft";

/// A post-like content entry (post, page, attachment, product, order, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Store-local numeric ID.
    pub id: u64,
    /// Type tag, e.g. `post`, `page`, `attachment`.
    pub post_type: String,
    /// URL slug (`post_name`).
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    /// Publication status, e.g. `publish`, `draft`.
    pub status: String,
    #[serde(default)]
    pub author: Option<u64>,
    /// Parent entry ID (pages, attachments).
    #[serde(default)]
    pub parent: Option<u64>,
    /// MIME type, only meaningful for attachments.
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub guid: String,
}

/// A taxonomy term (category, tag, post format, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Store-local numeric ID.
    pub term_id: u64,
    /// Taxonomy tag, e.g. `category`, `post_tag`, `post_format`.
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<u64>,
    /// Number of entries assigned to the term.
    #[serde(default)]
    pub count: u64,
}

/// The top-level kinds of entity the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Post-like entries, sub-classified by `post_type`.
    Entry,
    /// Taxonomy terms, sub-classified by `taxonomy`.
    Term,
}

/// Any entity fetched from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Entry(ContentEntry),
    Term(Term),
}

impl Entity {
    /// Returns the top-level kind of this entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Entry(_) => EntityKind::Entry,
            Self::Term(_) => EntityKind::Term,
        }
    }

    /// Returns the sub-classification tag: `post_type` for entries,
    /// `taxonomy` for terms.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Entry(entry) => &entry.post_type,
            Self::Term(term) => &term.taxonomy,
        }
    }

    /// Returns the store-local ID.
    #[must_use]
    pub fn local_id(&self) -> u64 {
        match self {
            Self::Entry(entry) => entry.id,
            Self::Term(term) => term.term_id,
        }
    }

    #[must_use]
    pub fn as_entry(&self) -> Option<&ContentEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Term(_) => None,
        }
    }

    #[must_use]
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Term(term) => Some(term),
            Self::Entry(_) => None,
        }
    }
}

impl From<ContentEntry> for Entity {
    fn from(entry: ContentEntry) -> Self {
        Self::Entry(entry)
    }
}

impl From<Term> for Entity {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

/// Fields accepted when creating an entry. Every field is optional; the
/// store applies its own defaults and validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryInput {
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub post_content: Option<String>,
    #[serde(default)]
    pub post_excerpt: Option<String>,
    #[serde(default)]
    pub post_status: Option<String>,
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub post_name: Option<String>,
    #[serde(default)]
    pub post_parent: Option<u64>,
    #[serde(default)]
    pub post_author: Option<u64>,
}

impl EntryInput {
    /// Returns `true` when title, content and excerpt are all missing or blank.
    #[must_use]
    pub fn is_empty_content(&self) -> bool {
        [&self.post_title, &self.post_content, &self.post_excerpt]
            .iter()
            .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// The state of the CMS main query for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Entries on the current page.
    pub posts: Vec<ContentEntry>,
    /// Total number of entries matching the query across all pages.
    pub found_posts: u64,
    pub max_num_pages: u64,
}

impl QueryState {
    /// Number of entries on the current page.
    #[must_use]
    pub fn post_count(&self) -> u64 {
        self.posts.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(post_type: &str) -> ContentEntry {
        ContentEntry {
            id: 7,
            post_type: post_type.to_string(),
            slug: "hello-world".to_string(),
            title: "Hello world".to_string(),
            content: String::new(),
            excerpt: String::new(),
            status: "publish".to_string(),
            author: None,
            parent: None,
            mime_type: None,
            date: OffsetDateTime::UNIX_EPOCH,
            guid: String::new(),
        }
    }

    #[test]
    fn test_entity_kind_and_tag() {
        let entity = Entity::from(entry("page"));
        assert_eq!(entity.kind(), EntityKind::Entry);
        assert_eq!(entity.tag(), "page");
        assert_eq!(entity.local_id(), 7);
        assert!(entity.as_term().is_none());

        let term = Entity::from(Term {
            term_id: 3,
            taxonomy: "category".to_string(),
            name: "News".to_string(),
            slug: "news".to_string(),
            description: String::new(),
            parent: None,
            count: 0,
        });
        assert_eq!(term.kind(), EntityKind::Term);
        assert_eq!(term.tag(), "category");
    }

    #[test]
    fn test_empty_content_detection() {
        assert!(EntryInput::default().is_empty_content());

        let blank = EntryInput {
            post_title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.is_empty_content());

        let titled = EntryInput {
            post_title: Some("Hello".to_string()),
            ..Default::default()
        };
        assert!(!titled.is_empty_content());
    }

    #[test]
    fn test_entry_input_from_json() {
        let input: EntryInput =
            serde_json::from_value(serde_json::json!({"post_title": "Hi", "post_parent": 4}))
                .unwrap();
        assert_eq!(input.post_title.as_deref(), Some("Hi"));
        assert_eq!(input.post_parent, Some(4));
        assert!(input.post_type.is_none());
    }
}
