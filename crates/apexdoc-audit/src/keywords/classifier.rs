//! Gap Classifier
//!
//! Buckets undocumented keywords into human-facing categories using an
//! ordered table of substring patterns. First matching category wins;
//! anything unmatched lands in [`OTHER_CATEGORY`].

use serde::{Deserialize, Serialize};

/// Catch-all bucket for keys that match no category
pub const OTHER_CATEGORY: &str = "Other";

/// A named category and the patterns that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub patterns: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact membership, or any pattern occurring case-insensitively in the key
    pub fn matches(&self, keyword: &str) -> bool {
        if self.patterns.iter().any(|p| p == keyword) {
            return true;
        }
        let lowered = keyword.to_lowercase();
        self.patterns
            .iter()
            .any(|p| !p.is_empty() && lowered.contains(&p.to_lowercase()))
    }
}

/// Keywords assigned to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Category buckets in declaration order, `Other` last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub buckets: Vec<CategoryBucket>,
}

impl Classification {
    /// Buckets that received at least one keyword
    pub fn non_empty(&self) -> impl Iterator<Item = &CategoryBucket> {
        self.buckets.iter().filter(|b| !b.keywords.is_empty())
    }

    /// Category a keyword was placed in
    pub fn category_of(&self, keyword: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|b| b.keywords.iter().any(|k| k == keyword))
            .map(|b| b.name.as_str())
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.keywords.len()).sum()
    }
}

/// Ordered-table keyword classifier
#[derive(Debug, Clone)]
pub struct GapClassifier {
    categories: Vec<Category>,
}

impl Default for GapClassifier {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl GapClassifier {
    /// Create a classifier from an ordered category table.
    ///
    /// A category literally named `Other` is ignored; the catch-all is always
    /// appended last.
    pub fn new(categories: Vec<Category>) -> Self {
        let categories = categories
            .into_iter()
            .filter(|c| c.name != OTHER_CATEGORY)
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Name of the first category matching `keyword`
    pub fn classify(&self, keyword: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.matches(keyword))
            .map_or(OTHER_CATEGORY, |c| c.name.as_str())
    }

    /// Place every keyword in exactly one bucket
    pub fn classify_all<'a, I>(&self, keywords: I) -> Classification
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut buckets: Vec<CategoryBucket> = self
            .categories
            .iter()
            .map(|c| CategoryBucket {
                name: c.name.clone(),
                keywords: Vec::new(),
            })
            .chain(std::iter::once(CategoryBucket {
                name: OTHER_CATEGORY.to_string(),
                keywords: Vec::new(),
            }))
            .collect();

        for keyword in keywords {
            let index = self
                .categories
                .iter()
                .position(|c| c.matches(keyword))
                .unwrap_or(self.categories.len());
            buckets[index].keywords.push(keyword.clone());
        }

        Classification { buckets }
    }
}

/// Built-in category table, drawn from the rules engine's YAML vocabulary.
///
/// Order matters: broad patterns such as `rule` sit after the more specific
/// chaining and calculation buckets.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Data Sources",
            [
                "data-source",
                "datasource",
                "connection",
                "database",
                "endpoint",
                "base-url",
                "api-key",
                "bearer-token",
                "token-url",
                "file-system",
                "file-pattern",
                "rest-api",
                "message-queue",
                "query",
                "ssl",
                "authentication",
            ],
        ),
        Category::new(
            "Caching & Performance",
            [
                "cache",
                "ttl",
                "eviction",
                "max-size",
                "timeout",
                "retry",
                "circuit-breaker",
                "failure-threshold",
                "interval",
                "batch",
                "performance",
            ],
        ),
        Category::new(
            "Lookup & Enrichment",
            [
                "enrichment",
                "lookup",
                "field-mapping",
                "source-field",
                "target-field",
                "dataset",
                "key-field",
                "default-value",
                "transformation",
            ],
        ),
        Category::new(
            "Calculations",
            [
                "calculation",
                "formula",
                "expression",
                "accumulat",
                "initial-value",
                "output-variable",
                "aggregate",
            ],
        ),
        Category::new(
            "Chaining & Workflow",
            [
                "chain",
                "depends-on",
                "pipeline",
                "stage",
                "step",
                "routing",
                "trigger",
                "on-success",
                "on-failure",
                "stop-on-error",
                "sequential",
                "workflow",
            ],
        ),
        Category::new(
            "Rules & Conditions",
            [
                "rule",
                "condition",
                "validation",
                "severity",
                "message",
                "priority",
                "threshold",
                "required-fields",
            ],
        ),
        Category::new(
            "Scenarios & Bootstrap",
            ["scenario", "data-types", "registry", "bootstrap"],
        ),
        Category::new(
            "Metadata",
            [
                "metadata",
                "author",
                "owner",
                "created-by",
                "business-domain",
                "version",
                "description",
                "tags",
                "last-updated",
            ],
        ),
    ]
}
