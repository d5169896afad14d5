use serde::{Deserialize, Serialize};

use super::Article;

/// Per-user reading preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Source ids the user wants to read from; empty means no restriction
    pub sources: Vec<String>,
    /// Category labels the user wants; empty means no restriction
    pub categories: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl UserPreferences {
    /// Creates empty preferences (no restrictions)
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Replaces the preferred sources, dropping duplicates
    pub fn set_sources(&mut self, sources: Vec<String>) {
        self.sources.clear();
        for source in sources {
            if !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
    }

    /// Replaces the preferred categories, dropping duplicates
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories.clear();
        for category in categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
    }

    /// Whether an article falls within these preferences
    ///
    /// An empty source or category list places no restriction on that field.
    /// An article without a category only matches when no category filter is
    /// set.
    pub fn matches(&self, article: &Article) -> bool {
        let source_ok = self.sources.is_empty() || self.sources.contains(&article.source);
        let category_ok = self.categories.is_empty()
            || article
                .category
                .as_ref()
                .is_some_and(|c| self.categories.contains(c));
        source_ok && category_ok
    }
}
