//! The searchable directory index.
//!
//! A [`DirectoryIndex`] is built once per population snapshot: it validates
//! directory integrity, derives every person's variant set, and embeds all
//! variants in a single batched pass. After `build` the index is read-only —
//! every method takes `&self` — so it can be shared across query threads and
//! replaced wholesale when the population changes. Incremental update is
//! deliberately unsupported: similarity geometry depends on the whole variant
//! set being embedded consistently.

use std::collections::{HashMap, HashSet};

use crate::embedding::{similarity, Embedder, LexicalEmbedder};
use crate::error::DirectoryIntegrityError;
use crate::matcher::RawHit;
use crate::person::{PersonId, PersonRecord};
use crate::variants::{variants_of, VariantEntry};

/// Immutable index over one population snapshot.
pub struct DirectoryIndex {
    people: Vec<PersonRecord>,
    by_id: HashMap<PersonId, usize>,
    variants: Vec<VariantEntry>,
    vectors: Vec<Vec<f32>>,
    embedder: Box<dyn Embedder>,
}

impl std::fmt::Debug for DirectoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryIndex")
            .field("people", &self.people.len())
            .field("variants", &self.variants.len())
            .finish_non_exhaustive()
    }
}

impl DirectoryIndex {
    /// Builds an index with the default [`LexicalEmbedder`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryIntegrityError`] if two records share an id or an
    /// email address (compared case-insensitively), or if a record carries an
    /// empty display name or a malformed email.
    pub fn build(people: Vec<PersonRecord>) -> Result<Self, DirectoryIntegrityError> {
        Self::build_with(people, Box::new(LexicalEmbedder::new()))
    }

    /// Builds an index with a caller-supplied embedding backend.
    ///
    /// The embedder is captured by the index so that queries are embedded in
    /// the same geometry as the stored variants.
    ///
    /// # Errors
    ///
    /// Same integrity checks as [`DirectoryIndex::build`].
    pub fn build_with(
        people: Vec<PersonRecord>,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self, DirectoryIntegrityError> {
        let mut by_id = HashMap::with_capacity(people.len());
        let mut seen_emails = HashSet::with_capacity(people.len());

        for (idx, person) in people.iter().enumerate() {
            if person.full_name.trim().is_empty() {
                return Err(DirectoryIntegrityError::EmptyFullName {
                    id: person.id.clone(),
                });
            }
            if !person.has_well_formed_email() {
                return Err(DirectoryIntegrityError::MalformedEmail {
                    id: person.id.clone(),
                    email: person.email.clone(),
                });
            }
            if by_id.insert(person.id.clone(), idx).is_some() {
                return Err(DirectoryIntegrityError::DuplicateId {
                    id: person.id.clone(),
                });
            }
            if !seen_emails.insert(person.email.to_lowercase()) {
                return Err(DirectoryIntegrityError::DuplicateEmail {
                    id: person.id.clone(),
                    email: person.email.clone(),
                });
            }
        }

        let mut variants = Vec::new();
        for person in &people {
            for text in variants_of(person) {
                variants.push(VariantEntry::new(text, person.id.clone()));
            }
        }

        // One vectorized pass over the whole variant set.
        let texts: Vec<String> = variants.iter().map(|v| v.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts);

        Ok(Self {
            people,
            by_id,
            variants,
            vectors,
            embedder,
        })
    }

    /// Number of people in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Returns true if the index holds no people.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// All people in the index, in insertion order.
    #[must_use]
    pub fn people(&self) -> &[PersonRecord] {
        &self.people
    }

    /// Looks up a person by id.
    #[must_use]
    pub fn person(&self, id: &PersonId) -> Option<&PersonRecord> {
        self.by_id.get(id).map(|&idx| &self.people[idx])
    }

    /// All variant entries in the index.
    #[must_use]
    pub fn all_variants(&self) -> &[VariantEntry] {
        &self.variants
    }

    /// Embeds query text with the index's own embedder.
    #[must_use]
    pub fn embed_query(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(text)
    }

    /// Returns the `k` variants closest to the query vector.
    ///
    /// Ordering is total and deterministic: similarity descending, then
    /// ascending person id, then variant text. `k = 0` yields an empty result.
    #[must_use]
    pub fn nearest_neighbors(&self, query: &[f32], k: usize) -> Vec<RawHit> {
        if k == 0 {
            return Vec::new();
        }

        let mut hits: Vec<RawHit> = self
            .variants
            .iter()
            .zip(self.vectors.iter())
            .map(|(variant, vector)| RawHit {
                variant: variant.clone(),
                similarity: similarity(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.variant.person_id.cmp(&b.variant.person_id))
                .then_with(|| a.variant.text.cmp(&b.variant.text))
        });
        hits.truncate(k);
        hits
    }
}
