//! Patient registration and lookup use-cases.
//!
//! # Invariants
//! - All five registration fields are required; `age` is a non-negative integer.
//! - A lookup that matches nothing is `NotFound`, not a storage failure.

use crate::model::patient::{NewPatient, Patient, PatientRegistration};
use crate::repo::patient_repo::PatientRepository;
use crate::repo::RepoError;
use crate::service::required;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for patient use-cases.
#[derive(Debug)]
pub enum PatientServiceError {
    /// A required field is absent or blank.
    MissingFields,
    /// A field is present but malformed.
    InvalidField { field: &'static str, value: String },
    /// No patient carries the requested enrollment code.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PatientServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "required patient fields are missing"),
            Self::InvalidField { field, value } => write!(f, "invalid {field}: `{value}`"),
            Self::NotFound(code) => write!(f, "patient not found for enrollment code `{code}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PatientServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PatientServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Patient service facade over repository implementations.
pub struct PatientService<R: PatientRepository> {
    repo: R,
}

impl<R: PatientRepository> PatientService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one patient and returns the stored row.
    pub fn register(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, PatientServiceError> {
        let patient = validate_registration(registration)?;
        match self.repo.insert_patient(&patient) {
            Ok(stored) => {
                info!(
                    "event=patient_register module=service status=ok patient_id={}",
                    stored.patient_id
                );
                Ok(stored)
            }
            Err(err) => {
                error!("event=patient_register module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Finds one patient by enrollment code.
    pub fn find_by_enrollment_code(&self, code: &str) -> Result<Patient, PatientServiceError> {
        let code = required(Some(code)).ok_or(PatientServiceError::MissingFields)?;
        self.repo
            .find_by_enrollment_code(code)?
            .ok_or_else(|| PatientServiceError::NotFound(code.to_string()))
    }
}

fn validate_registration(
    registration: &PatientRegistration,
) -> Result<NewPatient, PatientServiceError> {
    let (Some(name), Some(national_id), Some(enrollment_code), Some(sex), Some(age)) = (
        required(registration.name.as_deref()),
        required(registration.national_id.as_deref()),
        required(registration.enrollment_code.as_deref()),
        required(registration.sex.as_deref()),
        required(registration.age.as_deref()),
    ) else {
        return Err(PatientServiceError::MissingFields);
    };

    let age = age
        .parse::<u32>()
        .map_err(|_| PatientServiceError::InvalidField {
            field: "age",
            value: age.to_string(),
        })?;

    Ok(NewPatient {
        name: name.to_string(),
        national_id: national_id.to_string(),
        enrollment_code: enrollment_code.to_string(),
        sex: sex.to_string(),
        age,
    })
}

#[cfg(test)]
mod tests {
    use super::{validate_registration, PatientServiceError};
    use crate::model::patient::PatientRegistration;

    fn registration() -> PatientRegistration {
        PatientRegistration {
            name: Some(" Ana Souza ".to_string()),
            national_id: Some("123.456.789-00".to_string()),
            enrollment_code: Some("2024001".to_string()),
            sex: Some("F".to_string()),
            age: Some("34".to_string()),
        }
    }

    #[test]
    fn registration_is_trimmed_and_age_parsed() {
        let patient = validate_registration(&registration()).unwrap();
        assert_eq!(patient.name, "Ana Souza");
        assert_eq!(patient.age, 34);
    }

    #[test]
    fn registration_requires_every_field() {
        let mut missing_sex = registration();
        missing_sex.sex = None;
        assert!(matches!(
            validate_registration(&missing_sex),
            Err(PatientServiceError::MissingFields)
        ));

        let mut blank_name = registration();
        blank_name.name = Some("   ".to_string());
        assert!(matches!(
            validate_registration(&blank_name),
            Err(PatientServiceError::MissingFields)
        ));
    }

    #[test]
    fn registration_rejects_non_numeric_age() {
        let mut bad_age = registration();
        bad_age.age = Some("-3".to_string());
        assert!(matches!(
            validate_registration(&bad_age),
            Err(PatientServiceError::InvalidField { field: "age", .. })
        ));
    }
}
