//! Dental arch submission and entry model.
//!
//! # Responsibility
//! - Normalize a raw arch submission into typed, position-correlated entries.
//! - Define the persisted `ArchEntry` row shape.
//!
//! # Invariants
//! - A `ValidatedBatch` is non-empty and every entry shares one patient ref.
//! - Entry `i` pairs score token `i` with tooth ref `i`; input order is kept.
//! - Score tokens are opaque: any non-empty token is accepted.

use crate::model::patient::PatientId;
use crate::model::tooth::ToothId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Separator used by the delimited wire format.
pub const LIST_DELIMITER: char = ',';

/// Store-assigned arch entry identity.
pub type ArchEntryId = i64;

/// Ordered token list as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTokenList {
    /// Comma-delimited text, e.g. `"5,4,3"`.
    Delimited(String),
    /// Already structured list, e.g. `["5", "4", "3"]`.
    Items(Vec<String>),
}

impl RawTokenList {
    /// Returns whether every position is empty after trimming.
    ///
    /// `" "`, `","`, `[]` and `[" "]` are all blank.
    pub fn is_blank(&self) -> bool {
        self.tokens().iter().all(|token| token.is_empty())
    }

    /// Splits into trimmed tokens, keeping empty positions.
    ///
    /// `"5,,3"` yields three tokens, the middle one empty.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Delimited(text) => text.split(LIST_DELIMITER).map(str::trim).collect(),
            Self::Items(items) => items.iter().map(|item| item.trim()).collect(),
        }
    }
}

impl From<&str> for RawTokenList {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

/// Field of an arch submission, used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchField {
    Scores,
    PatientRef,
    ToothRefs,
}

impl Display for ArchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Scores => "scores",
            Self::PatientRef => "patient_ref",
            Self::ToothRefs => "tooth_refs",
        };
        f.write_str(name)
    }
}

/// Validation failures for arch submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchValidationError {
    /// At least one of scores, patient ref or tooth refs is absent or blank.
    MissingFields,
    /// Score and tooth lists split to different lengths.
    LengthMismatch { scores: usize, tooth_refs: usize },
    /// A list position holds an empty token.
    EmptyToken { field: ArchField, position: usize },
    /// A reference token is not an integer identifier.
    InvalidReference { field: ArchField, value: String },
}

impl Display for ArchValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "scores, patient ref and tooth refs are required"),
            Self::LengthMismatch { scores, tooth_refs } => write!(
                f,
                "score count {scores} does not match tooth count {tooth_refs}"
            ),
            Self::EmptyToken { field, position } => {
                write!(f, "empty {field} token at position {position}")
            }
            Self::InvalidReference { field, value } => {
                write!(f, "invalid {field} value `{value}`")
            }
        }
    }
}

impl Error for ArchValidationError {}

/// Raw arch submission for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchSubmission {
    pub scores: Option<RawTokenList>,
    pub patient_ref: Option<String>,
    pub tooth_refs: Option<RawTokenList>,
}

impl ArchSubmission {
    /// Builds a submission from the three delimited wire fields.
    pub fn delimited(scores: &str, patient_ref: &str, tooth_refs: &str) -> Self {
        Self {
            scores: Some(scores.into()),
            patient_ref: Some(patient_ref.to_string()),
            tooth_refs: Some(tooth_refs.into()),
        }
    }

    /// Validates the submission into a batch of correlated entries.
    ///
    /// Checks run in order: presence, list length match, empty tokens,
    /// reference parsing. No storage is touched.
    pub fn validate(&self) -> Result<ValidatedBatch, ArchValidationError> {
        let (scores, patient_ref, tooth_refs) = match (
            self.scores.as_ref().filter(|list| !list.is_blank()),
            self.patient_ref
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty()),
            self.tooth_refs.as_ref().filter(|list| !list.is_blank()),
        ) {
            (Some(scores), Some(patient_ref), Some(tooth_refs)) => {
                (scores.tokens(), patient_ref, tooth_refs.tokens())
            }
            _ => return Err(ArchValidationError::MissingFields),
        };

        if scores.len() != tooth_refs.len() {
            return Err(ArchValidationError::LengthMismatch {
                scores: scores.len(),
                tooth_refs: tooth_refs.len(),
            });
        }

        reject_empty(&scores, ArchField::Scores)?;
        reject_empty(&tooth_refs, ArchField::ToothRefs)?;

        let patient_ref = parse_reference(patient_ref, ArchField::PatientRef)?;
        let entries = scores
            .iter()
            .zip(&tooth_refs)
            .map(|(score, tooth)| -> Result<NewArchEntry, ArchValidationError> {
                Ok(NewArchEntry {
                    score: (*score).to_string(),
                    patient_ref,
                    tooth_ref: parse_reference(tooth, ArchField::ToothRefs)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedBatch {
            patient_ref,
            entries,
        })
    }
}

fn reject_empty(tokens: &[&str], field: ArchField) -> Result<(), ArchValidationError> {
    match tokens.iter().position(|token| token.is_empty()) {
        Some(position) => Err(ArchValidationError::EmptyToken { field, position }),
        None => Ok(()),
    }
}

fn parse_reference(value: &str, field: ArchField) -> Result<i64, ArchValidationError> {
    value
        .parse::<i64>()
        .map_err(|_| ArchValidationError::InvalidReference {
            field,
            value: value.to_string(),
        })
}

/// One `(score, patient_ref, tooth_ref)` triple awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArchEntry {
    pub score: String,
    pub patient_ref: PatientId,
    pub tooth_ref: ToothId,
}

/// Length-matched, ordered entries for one patient.
///
/// Only produced by [`ArchSubmission::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    patient_ref: PatientId,
    entries: Vec<NewArchEntry>,
}

impl ValidatedBatch {
    pub fn patient_ref(&self) -> PatientId {
        self.patient_ref
    }

    pub fn entries(&self) -> &[NewArchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persisted arch evaluation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchEntry {
    #[serde(rename = "cod_arcada")]
    pub entry_id: ArchEntryId,
    #[serde(rename = "avaliacao_arcada")]
    pub score: String,
    #[serde(rename = "fk_paciente_cod_paciente")]
    pub patient_ref: PatientId,
    #[serde(rename = "fk_dente_cod_dente")]
    pub tooth_ref: ToothId,
}
