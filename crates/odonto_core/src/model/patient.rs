//! Patient domain model.
//!
//! # Invariants
//! - `national_id` is unique across patients.
//! - A patient is immutable after registration.

use serde::{Deserialize, Serialize};

/// Store-assigned patient identity.
pub type PatientId = i64;

/// Registered patient as persisted.
///
/// Serialized with the column names existing clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "cod_paciente")]
    pub patient_id: PatientId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub national_id: String,
    #[serde(rename = "matricula")]
    pub enrollment_code: String,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "idade")]
    pub age: u32,
}

/// Raw registration input, one optional token per field.
///
/// `None` and blank strings are both treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRegistration {
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub enrollment_code: Option<String>,
    pub sex: Option<String>,
    pub age: Option<String>,
}

/// Validated patient row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub national_id: String,
    pub enrollment_code: String,
    pub sex: String,
    pub age: u32,
}
