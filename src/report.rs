//! The resolution report consumed by the orchestrating caller.
//!
//! [`ResolutionReport`] is the fixed wire structure of the engine boundary:
//! the caller forwards it to downstream scheduling logic, and at clarification
//! time hands it back verbatim so the pending state can be reconstructed. The
//! field names are part of the contract and must not drift.

use serde::{Deserialize, Serialize};

use crate::person::PersonRecord;
use crate::resolve::{MatchCandidate, ResolutionOutcome};

/// One confidently resolved input name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedName {
    /// The raw input name.
    pub input_name: String,

    /// The matched directory record.
    pub matched_user: PersonRecord,

    /// Similarity of the winning variant hit, in [0, 1].
    pub similarity_score: f32,
}

/// One input name with multiple surviving candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialMatch {
    /// The raw input name.
    pub input_name: String,

    /// Candidates ordered by similarity descending.
    pub candidates: Vec<MatchCandidate>,
}

/// Structured result of one resolution pass over a batch of names.
///
/// `ambiguous_names` pools every name that needs user attention — both the
/// multi-candidate ones (which also appear in `partial_matches`) and the
/// no-candidate ones (which do not).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Names that resolved to exactly one person.
    pub resolved_names: Vec<ResolvedName>,

    /// Names with two or more candidates, awaiting a user choice.
    pub partial_matches: Vec<PartialMatch>,

    /// All names that did not resolve confidently, in input order.
    pub ambiguous_names: Vec<String>,

    /// True iff any name did not resolve confidently.
    pub needs_clarification: bool,
}

impl ResolutionReport {
    /// Builds the report from a batch of outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[ResolutionOutcome]) -> Self {
        let mut report = Self {
            resolved_names: Vec::new(),
            partial_matches: Vec::new(),
            ambiguous_names: Vec::new(),
            needs_clarification: false,
        };

        for outcome in outcomes {
            match outcome {
                ResolutionOutcome::Resolved { input, candidate } => {
                    report.resolved_names.push(ResolvedName {
                        input_name: input.clone(),
                        matched_user: candidate.person(),
                        similarity_score: candidate.similarity,
                    });
                }
                ResolutionOutcome::Ambiguous { input, candidates } => {
                    report.partial_matches.push(PartialMatch {
                        input_name: input.clone(),
                        candidates: candidates.clone(),
                    });
                    report.ambiguous_names.push(input.clone());
                    report.needs_clarification = true;
                }
                ResolutionOutcome::Unmatched { input } => {
                    report.ambiguous_names.push(input.clone());
                    report.needs_clarification = true;
                }
            }
        }

        report
    }

    /// Reassembles the outcome list this report was built from.
    ///
    /// Inverse of [`ResolutionReport::from_outcomes`] up to outcome order:
    /// resolved names come first, then ambiguous and unmatched names in their
    /// original relative order. The caller round-trips the report as opaque
    /// JSON across the clarification turn, so this is how a session gets its
    /// pending state back.
    #[must_use]
    pub fn to_outcomes(&self) -> Vec<ResolutionOutcome> {
        let mut outcomes: Vec<ResolutionOutcome> = self
            .resolved_names
            .iter()
            .map(|r| ResolutionOutcome::Resolved {
                input: r.input_name.clone(),
                candidate: MatchCandidate {
                    person_id: r.matched_user.id.clone(),
                    full_name: r.matched_user.full_name.clone(),
                    email: r.matched_user.email.clone(),
                    similarity: r.similarity_score,
                },
            })
            .collect();

        for name in &self.ambiguous_names {
            match self
                .partial_matches
                .iter()
                .find(|m| &m.input_name == name)
            {
                Some(partial) => outcomes.push(ResolutionOutcome::Ambiguous {
                    input: partial.input_name.clone(),
                    candidates: partial.candidates.clone(),
                }),
                None => outcomes.push(ResolutionOutcome::Unmatched {
                    input: name.clone(),
                }),
            }
        }

        outcomes
    }
}

/// Splits a raw comma- or newline-delimited attendee string at the boundary.
///
/// Trims each piece and drops blanks. The engine itself receives names
/// pre-split; this is the helper callers apply first.
///
/// # Examples
///
/// ```
/// use rollcall::split_names;
///
/// let names = split_names("Ahmet, Arda Orçun\nZeynep,, ");
/// assert_eq!(names, vec!["Ahmet", "Arda Orçun", "Zeynep"]);
/// ```
#[must_use]
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonId;

    fn candidate(id: i64, name: &str, email: &str, similarity: f32) -> MatchCandidate {
        MatchCandidate {
            person_id: PersonId::from(id),
            full_name: name.to_string(),
            email: email.to_string(),
            similarity,
        }
    }

    fn outcomes() -> Vec<ResolutionOutcome> {
        vec![
            ResolutionOutcome::Resolved {
                input: "Zeynep".to_string(),
                candidate: candidate(5, "Zeynep Arslan", "zeynep.arslan@company.com", 1.0),
            },
            ResolutionOutcome::Ambiguous {
                input: "Ahmet".to_string(),
                candidates: vec![
                    candidate(1, "Ahmet Yılmaz", "ahmet.yilmaz@company.com", 1.0),
                    candidate(2, "Ahmet Kaya", "ahmet.kaya@company.com", 1.0),
                ],
            },
            ResolutionOutcome::Unmatched {
                input: "Zzzqqq".to_string(),
            },
        ]
    }

    #[test]
    fn report_buckets_outcomes_by_state() {
        let report = ResolutionReport::from_outcomes(&outcomes());
        assert_eq!(report.resolved_names.len(), 1);
        assert_eq!(report.partial_matches.len(), 1);
        assert_eq!(report.ambiguous_names, vec!["Ahmet", "Zzzqqq"]);
        assert!(report.needs_clarification);
    }

    #[test]
    fn fully_resolved_batch_needs_no_clarification() {
        let resolved = vec![ResolutionOutcome::Resolved {
            input: "Zeynep".to_string(),
            candidate: candidate(5, "Zeynep Arslan", "zeynep.arslan@company.com", 1.0),
        }];
        let report = ResolutionReport::from_outcomes(&resolved);
        assert!(!report.needs_clarification);
        assert!(report.ambiguous_names.is_empty());
        assert!(report.partial_matches.is_empty());
    }

    #[test]
    fn wire_field_names_are_fixed() {
        let report = ResolutionReport::from_outcomes(&outcomes());
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["resolved_names"][0]["matched_user"]["email_address"].is_string());
        assert_eq!(json["resolved_names"][0]["input_name"], "Zeynep");
        assert!(json["resolved_names"][0]["similarity_score"].is_number());
        assert_eq!(json["partial_matches"][0]["candidates"][0]["id"], "1");
        assert!(json["partial_matches"][0]["candidates"][0]["similarity"].is_number());
        assert_eq!(json["needs_clarification"], true);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ResolutionReport::from_outcomes(&outcomes());
        let json = serde_json::to_string(&report).unwrap();
        let back: ResolutionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn to_outcomes_reassembles_every_name() {
        let report = ResolutionReport::from_outcomes(&outcomes());
        let rebuilt = report.to_outcomes();
        assert_eq!(rebuilt.len(), 3);
        assert!(rebuilt[0].is_resolved());
        assert!(matches!(
            rebuilt[1],
            ResolutionOutcome::Ambiguous { ref input, ref candidates }
                if input == "Ahmet" && candidates.len() == 2
        ));
        assert!(matches!(
            rebuilt[2],
            ResolutionOutcome::Unmatched { ref input } if input == "Zzzqqq"
        ));
    }

    #[test]
    fn split_names_handles_commas_newlines_and_blanks() {
        assert_eq!(
            split_names("Ahmet,  Ali Şahin \n Zeynep,,\n"),
            vec!["Ahmet", "Ali Şahin", "Zeynep"]
        );
        assert!(split_names("  ,\n, ").is_empty());
    }
}
