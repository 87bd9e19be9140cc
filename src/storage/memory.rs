//! In-memory content store.
//!
//! Used by tests and for running the gate without a CMS. Individual slugs
//! can be marked as failing to exercise the lookup failure policy.

use super::{ContentStore, StoreError};
use crate::models::{Category, CategoryAccess};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: HashMap<String, Category>,
    failing: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a public category.
    pub fn with_public(mut self, slug: &str) -> Self {
        self.categories.insert(
            slug.to_string(),
            Category {
                slug: slug.to_string(),
                is_protected: false,
                password_hash: None,
            },
        );
        self
    }

    /// Add a protected category with the given verifier.
    pub fn with_protected(mut self, slug: &str, password_hash: &str) -> Self {
        self.categories.insert(
            slug.to_string(),
            Category {
                slug: slug.to_string(),
                is_protected: true,
                password_hash: Some(password_hash.to_string()),
            },
        );
        self
    }

    /// Make every lookup for `slug` fail with a network error.
    pub fn with_failure(mut self, slug: &str) -> Self {
        self.failing.insert(slug.to_string());
        self
    }

    fn check(&self, slug: &str) -> Result<(), StoreError> {
        if self.failing.contains(slug) {
            return Err(StoreError::Network(format!(
                "simulated failure for {}",
                slug
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn category_access(&self, slug: &str) -> Result<Option<CategoryAccess>, StoreError> {
        self.check(slug)?;
        Ok(self.categories.get(slug).map(Category::access))
    }

    async fn category(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        self.check(slug)?;
        Ok(self.categories.get(slug).cloned())
    }
}
