//! Variant generation for directory records.
//!
//! Every person is indexed under several normalized lookup strings so that
//! partial and accent-free mentions still land on the right record: the full
//! name, an ASCII transliteration, first/last name tokens, and forms derived
//! from the email local part. Generation is a pure function of the record —
//! the same record always yields the same variant set.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::person::{PersonId, PersonRecord};

/// A normalized lookup string owned by the directory index.
///
/// `person_id` is a back-reference, never an ownership edge; many entries may
/// point at the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantEntry {
    /// Normalized lookup text.
    pub text: String,

    /// Back-reference to the owning person.
    pub person_id: PersonId,
}

impl VariantEntry {
    /// Creates a new variant entry.
    #[must_use]
    pub fn new(text: impl Into<String>, person_id: PersonId) -> Self {
        Self {
            text: text.into(),
            person_id,
        }
    }
}

/// Characters treated as separators inside an email local part.
const LOCAL_PART_SEPARATORS: [char; 4] = ['.', '_', '-', '+'];

fn credential_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Trailing ", Ph.D" / ", PhD" / ", M.D." style credentials.
    RE.get_or_init(|| Regex::new(r"(?i),\s*(ph\.?\s*d\.?|m\.?d\.?)\s*$").unwrap())
}

/// Folds the fixed set of accented characters to their ASCII counterparts.
///
/// The mapping is intentionally a fixed table, not full Unicode normalization:
/// determinism matters more than coverage here, and the table covers the
/// accents that actually occur in the target populations.
#[must_use]
pub fn fold_diacritics(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'ç' | 'Ç' => Some('c'),
            'ğ' | 'Ğ' => Some('g'),
            'ı' | 'İ' => Some('i'),
            'ö' | 'Ö' => Some('o'),
            'ş' | 'Ş' => Some('s'),
            'ü' | 'Ü' => Some('u'),
            // Combining dot left behind by lowercasing 'İ'.
            '\u{0307}' => None,
            other => Some(other),
        })
        .collect()
}

/// Strips a trailing credential suffix (", Ph.D", ", PhD", ", M.D.") from a name.
#[must_use]
pub fn strip_credentials(name: &str) -> String {
    credential_suffix_re().replace(name, "").trim().to_string()
}

/// Derives the set of normalized lookup strings for one record.
///
/// Pure and deterministic: no side effects, and calling it twice on the same
/// record returns the same set. Produces, at minimum:
///
/// - the lowercased full name
/// - its diacritic-folded ASCII transliteration
/// - the first whitespace-delimited token
/// - the last whitespace-delimited token (equal to the first for one-token names)
/// - the lowercased email local part
/// - the local part with separators replaced by spaces
/// - the full name with a trailing credential suffix stripped
///
/// Empty or whitespace-only derivations are discarded; duplicates collapse
/// (set semantics).
#[must_use]
pub fn variants_of(record: &PersonRecord) -> BTreeSet<String> {
    let mut variants = BTreeSet::new();

    let full = record.full_name.trim().to_lowercase();
    insert_non_blank(&mut variants, full.clone());
    insert_non_blank(&mut variants, fold_diacritics(&full));

    if let Some(first) = full.split_whitespace().next() {
        insert_non_blank(&mut variants, first.to_string());
    }
    if let Some(last) = full.split_whitespace().next_back() {
        insert_non_blank(&mut variants, last.to_string());
    }

    let local = record.email_local_part().trim().to_lowercase();
    insert_non_blank(&mut variants, local.clone());
    insert_non_blank(
        &mut variants,
        local
            .replace(&LOCAL_PART_SEPARATORS[..], " ")
            .trim()
            .to_string(),
    );

    insert_non_blank(&mut variants, strip_credentials(&full));

    variants
}

fn insert_non_blank(set: &mut BTreeSet<String>, text: String) {
    if !text.trim().is_empty() {
        set.insert(text);
    }
}
