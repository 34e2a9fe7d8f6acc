//! Tooth catalogue repository.

use crate::model::tooth::Tooth;
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Read-only access to the seeded tooth catalogue.
pub trait ToothRepository {
    /// Lists every tooth ordered by id.
    fn list_teeth(&self) -> RepoResult<Vec<Tooth>>;
}

/// SQLite-backed tooth repository.
pub struct SqliteToothRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteToothRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ToothRepository for SqliteToothRepository<'_> {
    fn list_teeth(&self) -> RepoResult<Vec<Tooth>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cod_dente, nome FROM dente ORDER BY cod_dente ASC;")?;
        let mut rows = stmt.query([])?;
        let mut teeth = Vec::new();
        while let Some(row) = rows.next()? {
            teeth.push(Tooth {
                tooth_id: row.get("cod_dente")?,
                name: row.get("nome")?,
            });
        }
        Ok(teeth)
    }
}
