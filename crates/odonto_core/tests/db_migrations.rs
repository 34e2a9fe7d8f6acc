use odonto_core::db::migrations::latest_version;
use odonto_core::db::{open_db, open_db_in_memory, open_pool, open_pool_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["paciente", "dente", "arcada_dentaria", "media_paciente"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn tooth_catalogue_is_seeded_with_permanent_teeth() {
    let conn = open_db_in_memory().unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM dente;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 32);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let result = conn.execute(
        "INSERT INTO media_paciente (media, fk_paciente_cod_paciente) VALUES (5.0, 404);",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn reopening_a_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odonto.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO paciente (nome, cpf, matricula, sexo, idade)
         VALUES ('Ana', '111', 'M1', 'F', 30);",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened), latest_version());
    let patients: i64 = reopened
        .query_row("SELECT COUNT(*) FROM paciente;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(patients, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_error_names_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("odonto.sqlite3");

    match open_db(&path).unwrap_err() {
        DbError::Open { target, .. } => assert!(target.ends_with("odonto.sqlite3")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_pool_connections_share_one_migrated_store() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open_pool(dir.path().join("pooled.sqlite3"), 4).unwrap();

    let writer = pool.get().unwrap();
    let reader = pool.get().unwrap();
    for conn in [&writer, &reader] {
        assert_eq!(schema_version(conn), latest_version());
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
    let journal_mode: String = reader
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(journal_mode.to_lowercase(), "wal");

    writer
        .execute(
            "INSERT INTO paciente (nome, cpf, matricula, sexo, idade)
             VALUES ('Ana', '111', 'M1', 'F', 30);",
            [],
        )
        .unwrap();
    let patients: i64 = reader
        .query_row("SELECT COUNT(*) FROM paciente;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(patients, 1);
}

#[test]
fn memory_pool_keeps_its_store_between_checkouts() {
    let pool = open_pool_in_memory().unwrap();

    {
        let conn = pool.get().unwrap();
        assert_eq!(schema_version(&conn), latest_version());
        conn.execute(
            "INSERT INTO paciente (nome, cpf, matricula, sexo, idade)
             VALUES ('Ana', '111', 'M1', 'F', 30);",
            [],
        )
        .unwrap();
    }

    let conn = pool.get().unwrap();
    let patients: i64 = conn
        .query_row("SELECT COUNT(*) FROM paciente;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(patients, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
