//! Clarification sessions.
//!
//! When any name in a batch fails to resolve confidently, a
//! [`ClarificationSession`] holds the pending names with their candidate
//! lists, the already-resolved names, and the caller's opaque request context
//! across one user turn-around. Merging the user's free-text answer produces
//! the final attendee list — or a recoverable [`ClarificationError`] that
//! triggers a re-prompt without losing anything already resolved.
//!
//! A session lives for exactly one round trip. A second round of ambiguity
//! (e.g. a re-entered unmatched name) surfaces as a fresh session; opening a
//! new session for the same conversation implicitly discards the prior one.

use std::fmt;
use std::fmt::Write as _;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClarificationError;
use crate::person::PersonRecord;
use crate::report::{ResolutionReport, ResolvedName};
use crate::resolve::{MatchCandidate, ResolutionOutcome};

/// Unique identifier for one clarification session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One name still waiting on the user.
///
/// An empty candidate list means the name was unmatched: it cannot be
/// satisfied by a label choice and must be re-entered verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingName {
    /// The raw input name.
    pub input: String,

    /// Candidates offered to the user, ordered by similarity descending.
    pub candidates: Vec<MatchCandidate>,
}

/// State of one in-flight clarification round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationSession {
    /// Session identifier.
    pub id: SessionId,

    /// When the session was opened.
    pub opened_at: DateTime<Utc>,

    already_resolved: Vec<ResolvedName>,
    pending: Vec<PendingName>,
    context: serde_json::Value,
}

impl ClarificationSession {
    /// Opens a session over a batch of outcomes.
    ///
    /// Splits the outcomes into already-resolved and pending, preserving
    /// input order within each group. `context` is an opaque caller payload
    /// re-attached untouched at merge time. Intended to be called when at
    /// least one outcome is not `Resolved`; a session with no pending names
    /// merges trivially.
    #[must_use]
    pub fn open(outcomes: &[ResolutionOutcome], context: serde_json::Value) -> Self {
        let mut already_resolved = Vec::new();
        let mut pending = Vec::new();

        for outcome in outcomes {
            match outcome {
                ResolutionOutcome::Resolved { input, candidate } => {
                    already_resolved.push(ResolvedName {
                        input_name: input.clone(),
                        matched_user: candidate.person(),
                        similarity_score: candidate.similarity,
                    });
                }
                ResolutionOutcome::Ambiguous { input, candidates } => pending.push(PendingName {
                    input: input.clone(),
                    candidates: candidates.clone(),
                }),
                ResolutionOutcome::Unmatched { input } => pending.push(PendingName {
                    input: input.clone(),
                    candidates: Vec::new(),
                }),
            }
        }

        Self {
            id: SessionId::new(),
            opened_at: Utc::now(),
            already_resolved,
            pending,
            context,
        }
    }

    /// Opens a session from a round-tripped [`ResolutionReport`].
    ///
    /// Callers that carried the report across the turn boundary as JSON use
    /// this instead of keeping the outcome list alive.
    #[must_use]
    pub fn from_report(report: &ResolutionReport, context: serde_json::Value) -> Self {
        Self::open(&report.to_outcomes(), context)
    }

    /// The caller's opaque request context, untouched.
    #[must_use]
    pub fn context(&self) -> &serde_json::Value {
        &self.context
    }

    /// Names resolved confidently before the session opened.
    #[must_use]
    pub fn already_resolved(&self) -> &[ResolvedName] {
        &self.already_resolved
    }

    /// Names still waiting on the user.
    #[must_use]
    pub fn pending(&self) -> &[PendingName] {
        &self.pending
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Renders the numbered, human-readable clarification prompt.
    ///
    /// Each ambiguous name lists its candidates as
    /// `"{index}. {full_name} ({email_address})"`; unmatched names carry no
    /// options and ask for the name to be re-entered verbatim.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut out = String::from("Please make a selection:\n");
        for pending in &self.pending {
            if pending.candidates.is_empty() {
                let _ = write!(
                    out,
                    "\nNo match found for '{}'. Please re-enter the name.\n",
                    pending.input
                );
                continue;
            }

            let _ = write!(out, "\nOptions for '{}':\n", pending.input);
            for (i, candidate) in pending.candidates.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} ({})",
                    i + 1,
                    candidate.full_name,
                    candidate.email
                );
            }
        }
        out.trim_end().to_string()
    }

    /// Merges the user's free-text answer with the already-resolved names.
    ///
    /// Each non-empty line of the answer is stripped of a leading `"N. "`
    /// ordinal and a trailing `"(email)"` suffix, yielding a candidate label.
    /// Labels are matched against the still-uncovered pending names'
    /// candidates by case-insensitive substring containment in either
    /// direction; if that finds nothing, a second, whitespace-insensitive
    /// pass runs. The first matching candidate wins — no similarity scoring
    /// is re-applied here.
    ///
    /// The output always contains every already-resolved name, unchanged and
    /// first, followed by the clarified choices in pending order.
    ///
    /// # Errors
    ///
    /// [`ClarificationError::Unresolved`] if any pending name is left without
    /// an accepted candidate — including unmatched names (which have no
    /// candidates to choose from) and malformed or empty answers. The caller
    /// re-prompts; nothing already accepted is lost.
    pub fn merge(&self, answer: &str) -> Result<Vec<PersonRecord>, ClarificationError> {
        self.merge_with(answer, &[])
    }

    /// [`ClarificationSession::merge`] with extra prior resolutions appended.
    ///
    /// `previous` covers callers that accumulated resolved names outside this
    /// session (e.g. an earlier request in the same conversation); they are
    /// carried through unchanged after the session's own resolved names.
    ///
    /// # Errors
    ///
    /// Same as [`ClarificationSession::merge`].
    pub fn merge_with(
        &self,
        answer: &str,
        previous: &[ResolvedName],
    ) -> Result<Vec<PersonRecord>, ClarificationError> {
        let mut accepted: Vec<Option<&MatchCandidate>> = vec![None; self.pending.len()];

        for line in answer.lines() {
            let label = extract_label(line);
            if label.is_empty() {
                continue;
            }
            if let Some((slot, candidate)) = self.find_candidate(&label, &accepted) {
                accepted[slot] = Some(candidate);
            }
        }

        if let Some(missed) = self
            .pending
            .iter()
            .zip(accepted.iter())
            .find(|(_, accepted)| accepted.is_none())
        {
            return Err(ClarificationError::Unresolved {
                name: missed.0.input.clone(),
            });
        }

        let mut people: Vec<PersonRecord> = self
            .already_resolved
            .iter()
            .chain(previous.iter())
            .map(|r| r.matched_user.clone())
            .collect();
        people.extend(accepted.into_iter().flatten().map(MatchCandidate::person));
        Ok(people)
    }

    /// Single deterministic two-pass label match over the uncovered pendings.
    fn find_candidate<'a>(
        &'a self,
        label: &str,
        accepted: &[Option<&MatchCandidate>],
    ) -> Option<(usize, &'a MatchCandidate)> {
        let label = label.to_lowercase();

        // Pass 1: exact containment, either direction.
        for (slot, pending) in self.pending.iter().enumerate() {
            if accepted[slot].is_some() {
                continue;
            }
            for candidate in &pending.candidates {
                let name = candidate.full_name.to_lowercase();
                if name.contains(&label) || label.contains(&name) {
                    return Some((slot, candidate));
                }
            }
        }

        // Pass 2: stricter comparison with internal whitespace removed.
        let squeezed: String = label.split_whitespace().collect();
        if squeezed.is_empty() {
            return None;
        }
        for (slot, pending) in self.pending.iter().enumerate() {
            if accepted[slot].is_some() {
                continue;
            }
            for candidate in &pending.candidates {
                let name: String = candidate.full_name.to_lowercase().split_whitespace().collect();
                if name.contains(&squeezed) || squeezed.contains(&name) {
                    return Some((slot, candidate));
                }
            }
        }

        None
    }
}

fn ordinal_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\s*[.)]\s*").unwrap())
}

fn paren_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^()]*\)\s*$").unwrap())
}

/// Reduces one answer line to a candidate label.
///
/// Strips a leading `"N. "` / `"N) "` ordinal (as copied from the prompt) and
/// a trailing parenthesized email suffix, then trims.
fn extract_label(line: &str) -> String {
    let stripped = ordinal_prefix_re().replace(line, "");
    let stripped = paren_suffix_re().replace(&stripped, "");
    stripped.trim().to_string()
}
