//! Patient average use-cases.
//!
//! Averages are computed by clients; this service only checks shape and stores.

use crate::model::average::{NewPatientAverage, PatientAverage};
use crate::repo::average_repo::AverageRepository;
use crate::repo::RepoError;
use crate::service::required;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for average use-cases.
#[derive(Debug)]
pub enum AverageServiceError {
    /// Patient ref or average value is absent or blank.
    MissingFields,
    /// A field is present but malformed.
    InvalidField { field: &'static str, value: String },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AverageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "patient ref and average value are required"),
            Self::InvalidField { field, value } => write!(f, "invalid {field}: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AverageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AverageServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Average service facade over repository implementations.
pub struct AverageService<R: AverageRepository> {
    repo: R,
}

impl<R: AverageRepository> AverageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records one average for a patient and returns the stored row.
    pub fn record_average(
        &self,
        patient_ref: Option<&str>,
        average_value: Option<&str>,
    ) -> Result<PatientAverage, AverageServiceError> {
        let average = parse_average(patient_ref, average_value)?;
        match self.repo.insert_average(&average) {
            Ok(stored) => {
                info!(
                    "event=average_record module=service status=ok patient_ref={} average_id={}",
                    stored.patient_ref, stored.average_id
                );
                Ok(stored)
            }
            Err(err) => {
                error!(
                    "event=average_record module=service status=error patient_ref={} error={}",
                    average.patient_ref, err
                );
                Err(err.into())
            }
        }
    }

    /// Lists every stored average, oldest first.
    pub fn list_averages(&self) -> Result<Vec<PatientAverage>, AverageServiceError> {
        Ok(self.repo.list_averages()?)
    }
}

fn parse_average(
    patient_ref: Option<&str>,
    average_value: Option<&str>,
) -> Result<NewPatientAverage, AverageServiceError> {
    let (patient_ref, average_value) = match (required(patient_ref), required(average_value)) {
        (Some(patient_ref), Some(average_value)) => (patient_ref, average_value),
        _ => return Err(AverageServiceError::MissingFields),
    };

    let patient_ref = patient_ref
        .parse::<i64>()
        .map_err(|_| AverageServiceError::InvalidField {
            field: "patient_ref",
            value: patient_ref.to_string(),
        })?;
    let average_value = average_value
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AverageServiceError::InvalidField {
            field: "average_value",
            value: average_value.to_string(),
        })?;

    Ok(NewPatientAverage {
        patient_ref,
        average_value,
    })
}
