//! # rollcall - Name Resolution & Clarification Engine
//!
//! rollcall resolves free-text human name mentions (partial, accented, or
//! ambiguous, e.g. "Ahmet" matching three different employees) against a
//! directory of known people. Each input name classifies into exactly one of
//! three outcomes — a confident match, a bounded candidate set requiring user
//! clarification, or no match — and a clarification answer merges back into
//! the partially-resolved batch without losing anything already resolved.
//!
//! ## Core Concepts
//!
//! - **PersonRecord**: an immutable directory entry with a stable id
//! - **DirectoryIndex**: the searchable population, built once per snapshot
//! - **ResolutionOutcome**: tagged classification of one input name
//! - **ClarificationSession**: one pending request across one user turn-around
//!
//! ## Usage
//!
//! ```rust
//! use rollcall::{ClarificationSession, DirectoryIndex, PersonRecord, ResolverConfig};
//!
//! let index = DirectoryIndex::build(vec![
//!     PersonRecord::new(1, "Ahmet Yılmaz", "ahmet.yilmaz@company.com"),
//!     PersonRecord::new(2, "Ahmet Kaya", "ahmet.kaya@company.com"),
//!     PersonRecord::new(3, "Arda Orçun", "arda.orcun@company.com"),
//! ])?;
//!
//! let outcomes = rollcall::resolve(&["Ahmet", "Arda Orçun"], &index, &ResolverConfig::default());
//! if outcomes.iter().any(|o| !o.is_resolved()) {
//!     let session = ClarificationSession::open(&outcomes, serde_json::Value::Null);
//!     let attendees = session.merge("1. Ahmet Yılmaz (ahmet.yilmaz@company.com)")?;
//!     assert_eq!(attendees.len(), 2);
//! }
//! # Ok::<(), rollcall::RollcallError>(())
//! ```
//!
//! Determinism is the engine's only hard guarantee below the similarity
//! floor: grouping, ordering, and threshold behavior are reproducible for a
//! fixed embedding function. Semantic correctness of near-threshold matches
//! is explicitly not guaranteed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clarify;
pub mod directory;
pub mod embedding;
pub mod error;
pub mod matcher;
pub mod person;
pub mod report;
pub mod resolve;
pub mod variants;

// Re-export primary types at crate root for convenience
pub use clarify::{ClarificationSession, PendingName, SessionId};
pub use directory::DirectoryIndex;
pub use embedding::{Embedder, LexicalEmbedder};
pub use error::{
    ClarificationError, DirectoryIntegrityError, RollcallError, RollcallResult, ValidationError,
};
pub use matcher::RawHit;
pub use person::{PersonId, PersonRecord};
pub use report::{split_names, PartialMatch, ResolutionReport, ResolvedName};
pub use resolve::{resolve, MatchCandidate, ResolutionOutcome, ResolverConfig};
pub use variants::{variants_of, VariantEntry};
