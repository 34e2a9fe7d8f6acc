//! Patient repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Inserts return the stored row via `RETURNING`, including the assigned id.
//! - Lookup by enrollment code is deterministic: lowest id wins.

use crate::model::patient::{NewPatient, Patient};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PATIENT_COLUMNS: &str = "cod_paciente, nome, cpf, matricula, sexo, idade";

/// Repository interface for patient registration and lookup.
pub trait PatientRepository {
    /// Inserts one patient and returns the stored row.
    fn insert_patient(&self, patient: &NewPatient) -> RepoResult<Patient>;
    /// Finds a patient by enrollment code.
    fn find_by_enrollment_code(&self, code: &str) -> RepoResult<Option<Patient>>;
}

/// SQLite-backed patient repository.
pub struct SqlitePatientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PatientRepository for SqlitePatientRepository<'_> {
    fn insert_patient(&self, patient: &NewPatient) -> RepoResult<Patient> {
        let stored = self.conn.query_row(
            &format!(
                "INSERT INTO paciente (nome, cpf, matricula, sexo, idade)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {PATIENT_COLUMNS};"
            ),
            params![
                patient.name.as_str(),
                patient.national_id.as_str(),
                patient.enrollment_code.as_str(),
                patient.sex.as_str(),
                patient.age,
            ],
            |row| Ok(parse_patient_row(row)),
        )??;
        Ok(stored)
    }

    fn find_by_enrollment_code(&self, code: &str) -> RepoResult<Option<Patient>> {
        let found = self
            .conn
            .query_row(
                &format!(
                    "SELECT {PATIENT_COLUMNS}
                     FROM paciente
                     WHERE matricula = ?1
                     ORDER BY cod_paciente ASC
                     LIMIT 1;"
                ),
                [code],
                |row| Ok(parse_patient_row(row)),
            )
            .optional()?;
        found.transpose()
    }
}

fn parse_patient_row(row: &Row<'_>) -> RepoResult<Patient> {
    let age: i64 = row.get("idade")?;
    let age = u32::try_from(age).map_err(|_| {
        RepoError::InvalidData(format!("invalid age `{age}` in paciente.idade"))
    })?;

    Ok(Patient {
        patient_id: row.get("cod_paciente")?,
        name: row.get("nome")?,
        national_id: row.get("cpf")?,
        enrollment_code: row.get("matricula")?,
        sex: row.get("sexo")?,
        age,
    })
}
