//! Arch entry repository: the transactional write path for arch batches.
//!
//! # Responsibility
//! - Hand out a write scope that groups one batch of entry inserts.
//! - Read back persisted entries in insertion order.
//!
//! # Invariants
//! - A write scope owns exactly one store transaction.
//! - Entries inserted through a scope become visible only after `commit`.
//! - Dropping a scope without `commit` rolls every insert back.

use crate::model::arch::{ArchEntry, ArchEntryId, NewArchEntry};
use crate::model::patient::PatientId;
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ENTRY_SELECT_SQL: &str = "SELECT
    cod_arcada,
    avaliacao_arcada,
    fk_paciente_cod_paciente,
    fk_dente_cod_dente
FROM arcada_dentaria";

/// Transaction scope for one arch batch.
///
/// Implementations must discard uncommitted inserts when dropped.
pub trait ArchWriteScope {
    /// Inserts one entry inside the scope.
    fn insert_entry(&mut self, entry: &NewArchEntry) -> RepoResult<ArchEntryId>;
    /// Makes every insert of this scope durable and visible.
    fn commit(self) -> RepoResult<()>;
}

/// Repository interface for append-only arch entries.
pub trait ArchRepository {
    type Scope<'a>: ArchWriteScope
    where
        Self: 'a;

    /// Opens a write scope. Only one scope can be live per repository.
    fn begin_batch(&mut self) -> RepoResult<Self::Scope<'_>>;
    /// Lists every entry in insertion order.
    fn list_entries(&self) -> RepoResult<Vec<ArchEntry>>;
    /// Lists one patient's entries in insertion order.
    fn list_entries_for_patient(&self, patient_ref: PatientId) -> RepoResult<Vec<ArchEntry>>;
}

/// SQLite-backed arch repository.
pub struct SqliteArchRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteArchRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

/// SQLite write scope backed by an `IMMEDIATE` transaction.
pub struct SqliteArchScope<'a> {
    tx: Transaction<'a>,
}

impl ArchWriteScope for SqliteArchScope<'_> {
    fn insert_entry(&mut self, entry: &NewArchEntry) -> RepoResult<ArchEntryId> {
        self.tx.execute(
            "INSERT INTO arcada_dentaria (
                avaliacao_arcada,
                fk_paciente_cod_paciente,
                fk_dente_cod_dente
            ) VALUES (?1, ?2, ?3);",
            params![entry.score.as_str(), entry.patient_ref, entry.tooth_ref],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    fn commit(self) -> RepoResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl ArchRepository for SqliteArchRepository<'_> {
    type Scope<'a>
        = SqliteArchScope<'a>
    where
        Self: 'a;

    fn begin_batch(&mut self) -> RepoResult<Self::Scope<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(SqliteArchScope { tx })
    }

    fn list_entries(&self) -> RepoResult<Vec<ArchEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY cod_arcada ASC;"))?;
        let entries = stmt
            .query_map([], parse_entry_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_entries_for_patient(&self, patient_ref: PatientId) -> RepoResult<Vec<ArchEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE fk_paciente_cod_paciente = ?1
             ORDER BY cod_arcada ASC;"
        ))?;
        let entries = stmt
            .query_map([patient_ref], parse_entry_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> rusqlite::Result<ArchEntry> {
    Ok(ArchEntry {
        entry_id: row.get("cod_arcada")?,
        score: row.get("avaliacao_arcada")?,
        patient_ref: row.get("fk_paciente_cod_paciente")?,
        tooth_ref: row.get("fk_dente_cod_dente")?,
    })
}
