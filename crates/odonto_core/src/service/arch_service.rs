//! Arch submission use-case: validate, then record atomically.
//!
//! # Responsibility
//! - Turn a raw submission into a `ValidatedBatch` before any storage call.
//! - Persist a batch through one repository write scope.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - A batch is committed whole or not at all; a failed insert aborts the
//!   remaining inserts and the scope rolls back on drop.
//! - No retries: a failed batch is reported once.

use crate::model::arch::{
    ArchEntry, ArchEntryId, ArchSubmission, ArchValidationError, ValidatedBatch,
};
use crate::model::patient::PatientId;
use crate::repo::arch_repo::{ArchRepository, ArchWriteScope};
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for arch use-cases.
#[derive(Debug)]
pub enum ArchServiceError {
    /// Submission rejected before touching storage.
    Validation(ArchValidationError),
    /// Batch write failed and was rolled back.
    ///
    /// `position` is the zero-based entry whose insert failed; `None` when the
    /// scope could not be opened or committed.
    Persistence {
        position: Option<usize>,
        source: RepoError,
    },
    /// Read-path failure.
    Repo(RepoError),
}

impl Display for ArchServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence {
                position: Some(position),
                source,
            } => write!(
                f,
                "arch batch rolled back after insert {position} failed: {source}"
            ),
            Self::Persistence {
                position: None,
                source,
            } => write!(f, "arch batch rolled back: {source}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ArchServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ArchValidationError> for ArchServiceError {
    fn from(value: ArchValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ArchServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Acknowledgment of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchAck {
    /// Number of committed entries.
    pub rows: usize,
    /// Assigned entry ids in batch order.
    pub entry_ids: Vec<ArchEntryId>,
}

/// Arch use-case service over a repository implementation.
pub struct ArchService<R: ArchRepository> {
    repo: R,
}

impl<R: ArchRepository> ArchService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and records one submission.
    pub fn submit(&mut self, submission: &ArchSubmission) -> Result<ArchAck, ArchServiceError> {
        let batch = submission.validate().map_err(|err| {
            warn!("event=arch_submit module=service status=rejected reason={err}");
            err
        })?;
        self.record(&batch)
    }

    /// Records a validated batch in one write scope.
    ///
    /// # Side effects
    /// - Emits `arch_record` events with patient ref, row count and duration.
    pub fn record(&mut self, batch: &ValidatedBatch) -> Result<ArchAck, ArchServiceError> {
        let started_at = Instant::now();
        info!(
            "event=arch_record module=service status=start patient_ref={} rows={}",
            batch.patient_ref(),
            batch.len()
        );

        match self.write_batch(batch) {
            Ok(ack) => {
                info!(
                    "event=arch_record module=service status=ok patient_ref={} rows={} duration_ms={}",
                    batch.patient_ref(),
                    ack.rows,
                    started_at.elapsed().as_millis()
                );
                Ok(ack)
            }
            Err(err) => {
                error!(
                    "event=arch_record module=service status=error patient_ref={} rows={} duration_ms={} error={}",
                    batch.patient_ref(),
                    batch.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists every recorded entry in insertion order.
    pub fn list_entries(&self) -> Result<Vec<ArchEntry>, ArchServiceError> {
        Ok(self.repo.list_entries()?)
    }

    /// Lists one patient's recorded entries in insertion order.
    pub fn list_entries_for_patient(
        &self,
        patient_ref: PatientId,
    ) -> Result<Vec<ArchEntry>, ArchServiceError> {
        Ok(self.repo.list_entries_for_patient(patient_ref)?)
    }

    fn write_batch(&mut self, batch: &ValidatedBatch) -> Result<ArchAck, ArchServiceError> {
        let mut scope = self
            .repo
            .begin_batch()
            .map_err(|source| ArchServiceError::Persistence {
                position: None,
                source,
            })?;

        let mut entry_ids = Vec::with_capacity(batch.len());
        for (position, entry) in batch.entries().iter().enumerate() {
            let entry_id =
                scope
                    .insert_entry(entry)
                    .map_err(|source| ArchServiceError::Persistence {
                        position: Some(position),
                        source,
                    })?;
            entry_ids.push(entry_id);
        }

        scope
            .commit()
            .map_err(|source| ArchServiceError::Persistence {
                position: None,
                source,
            })?;

        Ok(ArchAck {
            rows: entry_ids.len(),
            entry_ids,
        })
    }
}
