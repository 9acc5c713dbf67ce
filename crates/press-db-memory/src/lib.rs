//! In-memory content store backend.
//!
//! This crate provides an in-memory implementation of the `ContentStore` trait
//! from `press-store`, using `dashmap` for concurrent access. It backs the
//! development server and the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use press_db_memory::InMemoryStore;
//! use press_store::{ContentStore, EntryInput};
//!
//! let store = InMemoryStore::new();
//! let id = store
//!     .create_entry(&EntryInput {
//!         post_title: Some("Hello world".into()),
//!         post_status: Some("publish".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

mod store_impl;
pub mod storage;

pub use press_store::{ContentStore, StoreError};
pub use storage::{InMemoryStore, StoreOptions, slugify};

/// Creates a new shareable in-memory store.
pub fn create_content_store(options: StoreOptions) -> press_store::DynContentStore {
    std::sync::Arc::new(InMemoryStore::with_options(options))
}
