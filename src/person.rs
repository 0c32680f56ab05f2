//! Person identity and directory records.
//!
//! A [`PersonRecord`] is the immutable unit of the searchable population.
//! Stable ids are the anchor everything else hangs off: variant entries
//! back-reference them, match candidates carry them, and aggregation dedupes
//! by them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, caller-assigned person identifier.
///
/// Ids are opaque to the engine; it only compares, hashes, and orders them.
/// The ordering is used as the deterministic tie-breaker when two candidates
/// score identically.
///
/// # Examples
///
/// ```
/// use rollcall::PersonId;
///
/// let a = PersonId::from(1);
/// let b = PersonId::from("1");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for PersonId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// An immutable directory record for one person.
///
/// `id` and `email` must each be unique across the population handed to
/// [`DirectoryIndex::build`](crate::DirectoryIndex::build); violations are a
/// directory-integrity error, not a resolution error.
///
/// # Examples
///
/// ```
/// use rollcall::PersonRecord;
///
/// let p = PersonRecord::new(1, "Ahmet Yılmaz", "ahmet.yilmaz@company.com");
/// assert_eq!(p.email_local_part(), "ahmet.yilmaz");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Stable unique identifier.
    pub id: PersonId,

    /// Non-empty display name.
    pub full_name: String,

    /// Unique, well-formed email address.
    #[serde(rename = "email_address")]
    pub email: String,
}

impl PersonRecord {
    /// Creates a new record.
    ///
    /// Validation (non-empty name, well-formed email, uniqueness) happens at
    /// index build time, not here, so callers can stage records freely.
    #[must_use]
    pub fn new(
        id: impl Into<PersonId>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: email.into(),
        }
    }

    /// Returns the text before the `@` of the email address.
    ///
    /// Falls back to the whole address if no `@` is present (the build step
    /// rejects such addresses before they reach resolution).
    #[must_use]
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Returns true if the email address is well-formed enough to index:
    /// exactly one `@`, a non-empty local part, and a domain containing a dot.
    #[must_use]
    pub fn has_well_formed_email(&self) -> bool {
        let mut parts = self.email.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let Some(domain) = parts.next() else {
            return false;
        };
        !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }
}

impl PartialEq for PersonRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PersonRecord {}

impl std::hash::Hash for PersonRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_id_orders_lexicographically() {
        let mut ids = vec![PersonId::from("3"), PersonId::from("1"), PersonId::from("2")];
        ids.sort();
        assert_eq!(ids[0], PersonId::from("1"));
        assert_eq!(ids[2], PersonId::from("3"));
    }

    #[test]
    fn person_id_from_integer() {
        assert_eq!(PersonId::from(42), PersonId::from("42"));
        assert_eq!(PersonId::from(42).as_str(), "42");
    }

    #[test]
    fn email_local_part_splits_at_sign() {
        let p = PersonRecord::new(1, "Ali Demir", "ali.demir@company.com");
        assert_eq!(p.email_local_part(), "ali.demir");
    }

    #[test]
    fn well_formed_email_accepted() {
        let p = PersonRecord::new(1, "X", "x@company.com");
        assert!(p.has_well_formed_email());
    }

    #[test]
    fn malformed_emails_rejected() {
        for bad in ["", "no-at-sign", "@company.com", "x@", "x@nodot", "a@b@c.com", "x@.com"] {
            let p = PersonRecord::new(1, "X", bad);
            assert!(!p.has_well_formed_email(), "accepted {bad:?}");
        }
    }

    #[test]
    fn records_compare_by_id() {
        let a = PersonRecord::new(1, "Name A", "a@x.com");
        let b = PersonRecord::new(1, "Name B", "b@x.com");
        assert_eq!(a, b);
    }

    #[test]
    fn record_serializes_email_as_email_address() {
        let p = PersonRecord::new(1, "Ali Demir", "ali.demir@company.com");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["email_address"], "ali.demir@company.com");
        assert_eq!(json["id"], "1");

        let back: PersonRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.email, p.email);
    }
}
