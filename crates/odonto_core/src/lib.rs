//! Core domain logic for the dental exam recorder.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::arch::{
    ArchEntry, ArchEntryId, ArchField, ArchSubmission, ArchValidationError, NewArchEntry,
    RawTokenList, ValidatedBatch,
};
pub use model::average::{NewPatientAverage, PatientAverage};
pub use model::patient::{NewPatient, Patient, PatientId, PatientRegistration};
pub use model::tooth::{Tooth, ToothId};
pub use repo::arch_repo::{ArchRepository, ArchWriteScope, SqliteArchRepository};
pub use repo::average_repo::{AverageRepository, SqliteAverageRepository};
pub use repo::patient_repo::{PatientRepository, SqlitePatientRepository};
pub use repo::tooth_repo::{SqliteToothRepository, ToothRepository};
pub use repo::{RepoError, RepoResult};
pub use service::arch_service::{ArchAck, ArchService, ArchServiceError};
pub use service::average_service::{AverageService, AverageServiceError};
pub use service::patient_service::{PatientService, PatientServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
