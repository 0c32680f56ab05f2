//! Similarity matching over the directory index.
//!
//! A query string is lowercased, embedded with the index's embedder, and
//! compared against every indexed variant. The result is the raw top-K hit
//! list the aggregator collapses by person identity — a person typically
//! appears several times here, once per matching variant.

use serde::{Deserialize, Serialize};

use crate::directory::DirectoryIndex;
use crate::variants::VariantEntry;

/// One raw hit from the similarity matcher, before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// The indexed variant that matched.
    pub variant: VariantEntry,

    /// Closeness score in [0, 1]; higher is more similar.
    pub similarity: f32,
}

/// Returns the `k` indexed variants most similar to `text`.
///
/// Deterministic for a fixed index: the same query always returns the same
/// ordering and scores. `k` bounds the raw candidate pool before aggregation
/// and must be at least the number of plausible simultaneous namesakes in the
/// population.
#[must_use]
pub fn top_k(text: &str, index: &DirectoryIndex, k: usize) -> Vec<RawHit> {
    let query = index.embed_query(&text.trim().to_lowercase());
    index.nearest_neighbors(&query, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonRecord;

    fn index() -> DirectoryIndex {
        DirectoryIndex::build(vec![
            PersonRecord::new(1, "Ahmet Yılmaz", "ahmet.yilmaz@company.com"),
            PersonRecord::new(2, "Zeynep Arslan", "zeynep.arslan@company.com"),
        ])
        .unwrap()
    }

    #[test]
    fn query_is_case_insensitive() {
        let index = index();
        let upper = top_k("AHMET YILMAZ", &index, 3);
        let lower = top_k("ahmet yilmaz", &index, 3);
        assert_eq!(upper, lower);
    }

    #[test]
    fn query_ignores_surrounding_whitespace() {
        let index = index();
        assert_eq!(top_k("  zeynep  ", &index, 3), top_k("zeynep", &index, 3));
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let index = index();
        let a = top_k("ahmet", &index, 5);
        let b = top_k("ahmet", &index, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn accent_free_query_hits_folded_variant() {
        let index = index();
        let hits = top_k("ahmet yilmaz", &index, 3);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].variant.text, "ahmet yilmaz");
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    }
}
