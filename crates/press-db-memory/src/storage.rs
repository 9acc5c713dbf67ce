use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use press_store::{ContentEntry, Term};

/// Options for the in-memory backend.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Page size of the main query.
    pub posts_per_page: u64,
    /// Extensions reported as active.
    pub active_extensions: BTreeSet<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            active_extensions: BTreeSet::new(),
        }
    }
}

/// In-memory content store.
///
/// Entries and terms share nothing but the ID counter, so an entry and a term
/// never carry the same local ID.
#[derive(Debug)]
pub struct InMemoryStore {
    pub(crate) entries: DashMap<u64, ContentEntry>,
    pub(crate) terms: DashMap<u64, Term>,
    /// entry ID -> assigned term IDs
    pub(crate) relationships: DashMap<u64, Vec<u64>>,
    /// (post type, slug) -> entry ID
    pub(crate) slugs: DashMap<(String, String), u64>,
    next_id: AtomicU64,
    pub(crate) options: StoreOptions,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Creates an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            entries: DashMap::new(),
            terms: DashMap::new(),
            relationships: DashMap::new(),
            slugs: DashMap::new(),
            next_id: AtomicU64::new(1),
            options,
        }
    }

    /// Marks an extension as active.
    #[must_use]
    pub fn with_active_extension(mut self, extension: impl Into<String>) -> Self {
        self.options.active_extensions.insert(extension.into());
        self
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Inserts an entry as-is. An ID of `0` is replaced by a fresh one.
    /// Returns the stored ID.
    pub fn insert_entry(&self, mut entry: ContentEntry) -> u64 {
        if entry.id == 0 {
            entry.id = self.next_id();
        } else {
            self.next_id.fetch_max(entry.id + 1, Ordering::SeqCst);
        }
        let id = entry.id;
        let key = (entry.post_type.clone(), entry.slug.clone());
        if let Some(previous) = self.entries.insert(id, entry) {
            self.release_slug(&previous, id);
        }
        self.slugs.insert(key, id);
        id
    }

    /// Reserves `slug` for entry `id` within `post_type`. Returns `false` if
    /// another entry holds it.
    pub(crate) fn claim_slug(&self, post_type: &str, slug: &str, id: u64) -> bool {
        match self.slugs.entry((post_type.to_string(), slug.to_string())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                true
            }
        }
    }

    pub(crate) fn slug_owner(&self, post_type: &str, slug: &str) -> Option<u64> {
        self.slugs
            .get(&(post_type.to_string(), slug.to_string()))
            .map(|id| *id)
    }

    fn release_slug(&self, previous: &ContentEntry, id: u64) {
        let key = (previous.post_type.clone(), previous.slug.clone());
        self.slugs.remove_if(&key, |_, owner| *owner == id);
    }

    /// Inserts a term as-is. A `term_id` of `0` is replaced by a fresh one.
    /// Returns the stored ID.
    pub fn insert_term(&self, mut term: Term) -> u64 {
        if term.term_id == 0 {
            term.term_id = self.next_id();
        } else {
            self.next_id.fetch_max(term.term_id + 1, Ordering::SeqCst);
        }
        let id = term.term_id;
        self.terms.insert(id, term);
        id
    }

    /// Assigns a term to an entry and bumps the term's count.
    /// Assigning the same term twice is a no-op.
    pub fn assign_term(&self, entry_id: u64, term_id: u64) {
        let mut assigned = self.relationships.entry(entry_id).or_default();
        if assigned.contains(&term_id) {
            return;
        }
        assigned.push(term_id);
        drop(assigned);

        if let Some(mut term) = self.terms.get_mut(&term_id) {
            term.count += 1;
        }
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Derives a slug from a title: lowercase ASCII alphanumerics, every other
/// run of characters collapsed to a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
