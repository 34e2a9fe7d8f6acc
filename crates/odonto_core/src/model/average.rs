//! Patient score average model.

use crate::model::patient::PatientId;
use serde::{Deserialize, Serialize};

/// One recorded average. Rows accumulate; the latest is not tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAverage {
    #[serde(rename = "cod_media")]
    pub average_id: i64,
    #[serde(rename = "media")]
    pub average_value: f64,
    #[serde(rename = "fk_paciente_cod_paciente")]
    pub patient_ref: PatientId,
}

/// Validated average row ready for insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPatientAverage {
    pub patient_ref: PatientId,
    pub average_value: f64,
}
