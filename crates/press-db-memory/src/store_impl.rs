//! Implementation of the `ContentStore` trait for `InMemoryStore`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use press_store::{
    ContentEntry, ContentStore, DEFAULT_POST_STATUS, DEFAULT_POST_TYPE, EntryInput, QueryState,
    StoreError, StoreResult, Term,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::storage::{InMemoryStore, slugify};

const PUBLISHED: &str = "publish";

impl InMemoryStore {
    /// Claims a slug unique within the post type, suffixing `-2`, `-3`, ...
    fn claim_unique_slug(&self, base: &str, post_type: &str, id: u64) -> String {
        if self.claim_slug(post_type, base, id) {
            return base.to_string();
        }
        (2u64..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.claim_slug(post_type, candidate, id))
            .unwrap_or_else(|| base.to_string())
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn fetch_entry(&self, id: u64) -> StoreResult<Option<ContentEntry>> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn fetch_entry_by_slug(
        &self,
        slug: &str,
        post_type: &str,
    ) -> StoreResult<Option<ContentEntry>> {
        Ok(self
            .slug_owner(post_type, slug)
            .and_then(|id| self.entries.get(&id).map(|e| e.clone())))
    }

    async fn fetch_term(&self, id: u64) -> StoreResult<Option<Term>> {
        Ok(self.terms.get(&id).map(|t| t.clone()))
    }

    async fn fetch_entry_terms(
        &self,
        entry_id: u64,
        taxonomy: Option<&str>,
    ) -> StoreResult<Vec<Term>> {
        let term_ids = self
            .relationships
            .get(&entry_id)
            .map(|ids| ids.clone())
            .unwrap_or_default();

        Ok(term_ids
            .iter()
            .filter_map(|id| self.terms.get(id).map(|t| t.clone()))
            .filter(|t| taxonomy.is_none_or(|tax| t.taxonomy == tax))
            .collect())
    }

    async fn query_state(&self) -> StoreResult<QueryState> {
        let mut published: Vec<ContentEntry> = self
            .entries
            .iter()
            .filter(|e| e.post_type == DEFAULT_POST_TYPE && e.status == PUBLISHED)
            .map(|e| e.clone())
            .collect();
        published.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        let found_posts = published.len() as u64;
        let per_page = self.options.posts_per_page.max(1);
        let max_num_pages = found_posts.div_ceil(per_page);
        published.truncate(per_page as usize);

        Ok(QueryState {
            posts: published,
            found_posts,
            max_num_pages,
        })
    }

    async fn create_entry(&self, input: &EntryInput) -> StoreResult<u64> {
        if input.is_empty_content() {
            return Err(StoreError::rejected(
                "empty_content",
                "Content, title, and excerpt are empty.",
            ));
        }
        if let Some(parent) = input.post_parent {
            if !self.entries.contains_key(&parent) {
                return Err(StoreError::rejected(
                    "invalid_parent",
                    "Invalid parent ID.",
                ));
            }
        }

        let id = self.next_id();
        let title = input.post_title.clone().unwrap_or_default();
        let post_type = input
            .post_type
            .clone()
            .unwrap_or_else(|| DEFAULT_POST_TYPE.to_string());
        let base_slug = input
            .post_name
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(slugify(&title)).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| id.to_string());
        let slug = self.claim_unique_slug(&base_slug, &post_type, id);

        let entry = ContentEntry {
            id,
            post_type,
            slug,
            title,
            content: input.post_content.clone().unwrap_or_default(),
            excerpt: input.post_excerpt.clone().unwrap_or_default(),
            status: input
                .post_status
                .clone()
                .unwrap_or_else(|| DEFAULT_POST_STATUS.to_string()),
            author: input.post_author,
            parent: input.post_parent,
            mime_type: None,
            date: OffsetDateTime::now_utc(),
            guid: format!("?p={id}"),
        };

        debug!(id, post_type = %entry.post_type, slug = %entry.slug, "Entry created");
        self.entries.insert(id, entry);
        Ok(id)
    }

    async fn list_active_extensions(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self.options.active_extensions.clone())
    }
}
