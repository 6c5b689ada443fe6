//! Deterministic anchor slugs.
//!
//! The base rule:
//! - Lowercase the text
//! - Remove everything except word characters, whitespace and hyphens
//! - Replace each run of whitespace and underscores with a single hyphen
//! - Trim leading/trailing hyphens
//!
//! Within one [`Slugifier`], the first use of a base slug yields the bare slug and the Nth
//! repeat yields `slug-N`.

use std::collections::{HashMap, HashSet};

/// Fallback for text that reduces to nothing.
const EMPTY_SLUG: &str = "heading";

/// Computes the base slug of `text`, without deduplication.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '_' {
            pending_hyphen = true;
        } else if c.is_alphanumeric() || c == '-' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
        // Anything else is dropped without breaking a whitespace run.
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generates unique slugs for one document.
///
/// Tracks every id handed out, including explicitly reserved ones, so a generated `slug-N`
/// never collides with an id that is already taken.
#[derive(Debug, Default, Clone)]
pub struct Slugifier {
    /// Count of how many times each base slug has been requested.
    counts: HashMap<String, usize>,
    /// Every id handed out so far.
    used: HashSet<String>,
}

impl Slugifier {
    /// Creates a new slugifier with no prior slugs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a unique slug for `text`.
    pub fn slugify(&mut self, text: &str) -> String {
        self.deduplicate(slugify(text))
    }

    /// Claims an explicit id as written. If it is already taken, returns the next free
    /// `id-N` instead.
    pub fn reserve(&mut self, id: &str) -> String {
        if self.used.insert(id.to_string()) {
            id.to_string()
        } else {
            self.deduplicate(id.to_string())
        }
    }

    /// Returns true if `id` has been handed out.
    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Ensures the slug is unique, appending `-N` suffix if needed.
    fn deduplicate(&mut self, base: String) -> String {
        let count = self.counts.entry(base.clone()).or_insert(0);
        loop {
            let candidate = if *count == 0 {
                base.clone()
            } else {
                format!("{base}-{count}")
            };
            *count += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
