//! Patient average repository contracts and SQLite implementation.

use crate::model::average::{NewPatientAverage, PatientAverage};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row};

/// Repository interface for append-only patient averages.
pub trait AverageRepository {
    /// Inserts one average and returns the stored row.
    fn insert_average(&self, average: &NewPatientAverage) -> RepoResult<PatientAverage>;
    /// Lists every stored average, oldest first.
    fn list_averages(&self) -> RepoResult<Vec<PatientAverage>>;
}

/// SQLite-backed average repository.
pub struct SqliteAverageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAverageRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AverageRepository for SqliteAverageRepository<'_> {
    fn insert_average(&self, average: &NewPatientAverage) -> RepoResult<PatientAverage> {
        let stored = self.conn.query_row(
            "INSERT INTO media_paciente (media, fk_paciente_cod_paciente)
             VALUES (?1, ?2)
             RETURNING cod_media, media, fk_paciente_cod_paciente;",
            params![average.average_value, average.patient_ref],
            parse_average_row,
        )?;
        Ok(stored)
    }

    fn list_averages(&self) -> RepoResult<Vec<PatientAverage>> {
        let mut stmt = self.conn.prepare(
            "SELECT cod_media, media, fk_paciente_cod_paciente
             FROM media_paciente
             ORDER BY cod_media ASC;",
        )?;
        let averages = stmt
            .query_map([], parse_average_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(averages)
    }
}

fn parse_average_row(row: &Row<'_>) -> rusqlite::Result<PatientAverage> {
    Ok(PatientAverage {
        average_id: row.get("cod_media")?,
        average_value: row.get("media")?,
        patient_ref: row.get("fk_paciente_cod_paciente")?,
    })
}
