//! Candidate aggregation and outcome classification.
//!
//! This is the heart of the engine: raw variant hits are collapsed by person
//! identity (a person may match under several variants and must count once),
//! filtered by the similarity threshold, and classified into exactly one
//! [`ResolutionOutcome`] per input name. Everything here is deterministic —
//! the same inputs always produce bit-identical outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::directory::DirectoryIndex;
use crate::error::ValidationError;
use crate::matcher;
use crate::person::{PersonId, PersonRecord};

/// Default similarity threshold.
///
/// A tunable, not a constant: raising it trades recall for precision.
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Default bound on raw hits fetched per query before aggregation.
pub const DEFAULT_TOP_K: usize = 10;

/// Tunables for one resolution pass.
///
/// Passed explicitly into `resolve` rather than read from process-wide state,
/// so parallel callers can run with different thresholds.
///
/// # Examples
///
/// ```
/// use rollcall::ResolverConfig;
///
/// let config = ResolverConfig::new(0.8, 20).unwrap();
/// assert_eq!(config.threshold, 0.8);
/// assert!(ResolverConfig::new(1.5, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Minimum similarity a candidate must clear to survive aggregation.
    pub threshold: f32,

    /// Raw-hit bound per query. Must be at least the number of plausible
    /// simultaneous namesakes expected in the population.
    pub top_k: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ResolverConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `threshold` is outside [0.0, 1.0] or
    /// `top_k` is zero.
    pub fn new(threshold: f32, top_k: usize) -> Result<Self, ValidationError> {
        let config = Self { threshold, top_k };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`ResolverConfig::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ValidationError::ThresholdOutOfRange {
                value: self.threshold,
            });
        }
        if self.top_k == 0 {
            return Err(ValidationError::InvalidTopK { value: self.top_k });
        }
        Ok(())
    }
}

/// The best surviving match for one person against one input name.
///
/// After aggregation at most one candidate exists per distinct person id for
/// a given input name — the highest-similarity variant hit for that person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// The matched person's id.
    #[serde(rename = "id")]
    pub person_id: PersonId,

    /// The matched person's display name.
    pub full_name: String,

    /// The matched person's email address.
    #[serde(rename = "email_address")]
    pub email: String,

    /// Best similarity across all of the person's variants, in [0, 1].
    pub similarity: f32,
}

impl MatchCandidate {
    /// Reconstructs the directory record this candidate refers to.
    #[must_use]
    pub fn person(&self) -> PersonRecord {
        PersonRecord::new(self.person_id.clone(), self.full_name.clone(), self.email.clone())
    }
}

/// Classification of one input name, tagged over three states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Exactly one person cleared the threshold.
    Resolved {
        /// The raw input name as supplied by the caller.
        input: String,
        /// The single surviving candidate.
        candidate: MatchCandidate,
    },

    /// Two or more people cleared the threshold; user must choose.
    Ambiguous {
        /// The raw input name as supplied by the caller.
        input: String,
        /// Candidates ordered by similarity descending, ties broken by
        /// ascending person id.
        candidates: Vec<MatchCandidate>,
    },

    /// Nobody cleared the threshold.
    Unmatched {
        /// The raw input name as supplied by the caller.
        input: String,
    },
}

impl ResolutionOutcome {
    /// The input name this outcome classifies.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Resolved { input, .. }
            | Self::Ambiguous { input, .. }
            | Self::Unmatched { input } => input,
        }
    }

    /// Returns true for the `Resolved` state.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Resolves a batch of raw name strings against the index.
///
/// One outcome per non-blank input name, order preserved; blank or
/// whitespace-only names are skipped entirely and produce no outcome.
///
/// Per name: fetch `config.top_k` raw hits, keep the best similarity per
/// person, drop people below `config.threshold`, then classify by survivor
/// count (0 → `Unmatched`, 1 → `Resolved`, 2+ → `Ambiguous`).
#[must_use]
pub fn resolve<S: AsRef<str>>(
    names: &[S],
    index: &DirectoryIndex,
    config: &ResolverConfig,
) -> Vec<ResolutionOutcome> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.trim().is_empty())
        .map(|name| resolve_one(name, index, config))
        .collect()
}

fn resolve_one(name: &str, index: &DirectoryIndex, config: &ResolverConfig) -> ResolutionOutcome {
    let hits = matcher::top_k(name, index, config.top_k);

    // Dedup step: best similarity per person. BTreeMap keeps person ids in
    // ascending order, which the tie-break below relies on.
    let mut best: BTreeMap<PersonId, f32> = BTreeMap::new();
    for hit in hits {
        let entry = best.entry(hit.variant.person_id).or_insert(hit.similarity);
        if hit.similarity > *entry {
            *entry = hit.similarity;
        }
    }

    let mut candidates: Vec<MatchCandidate> = best
        .into_iter()
        .filter(|&(_, similarity)| similarity >= config.threshold)
        .filter_map(|(person_id, similarity)| {
            index.person(&person_id).map(|person| MatchCandidate {
                person_id: person.id.clone(),
                full_name: person.full_name.clone(),
                email: person.email.clone(),
                similarity,
            })
        })
        .collect();

    // Similarity descending; the sort is stable, so equal scores stay in
    // ascending person-id order.
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let input = name.to_string();
    match candidates.len() {
        0 => ResolutionOutcome::Unmatched { input },
        1 => ResolutionOutcome::Resolved {
            input,
            candidate: candidates.remove(0),
        },
        _ => ResolutionOutcome::Ambiguous { input, candidates },
    }
}
