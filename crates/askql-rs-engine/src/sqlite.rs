//! Local SQL execution.

use askql_rs_protocol::{EngineError, Table};
use async_trait::async_trait;
use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Executes SQL text and returns the full result table.
#[async_trait]
pub trait SqlRunner: Send + Sync {
    async fn run(&self, sql: &str) -> Result<Table, EngineError>;
}

/// Runs queries against a SQLite database file.
///
/// A connection is opened per query on the blocking pool. The file must
/// already exist.
#[derive(Debug, Clone)]
pub struct SqliteRunner {
    path: PathBuf,
}

impl SqliteRunner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SqlRunner for SqliteRunner {
    async fn run(&self, sql: &str) -> Result<Table, EngineError> {
        let path = self.path.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || query(&path, &sql))
            .await
            .map_err(|err| EngineError::Query(format!("query task failed: {err}")))?
    }
}

fn query(path: &Path, sql: &str) -> Result<Table, EngineError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
    )
    .map_err(|err| EngineError::Query(format!("failed to open {}: {err}", path.display())))?;
    let mut stmt = conn.prepare(sql).map_err(query_err)?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let mut seen = HashSet::new();
    if let Some(duplicate) = columns.iter().find(|column| !seen.insert(column.as_str())) {
        return Err(EngineError::Query(format!(
            "DataFrame columns must be unique for orient='records' (duplicate column: {duplicate})"
        )));
    }
    let width = columns.len();

    let mut rows = stmt.query([]).map_err(query_err)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(query_err)? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(cell_value(row.get_ref(idx).map_err(query_err)?));
        }
        out.push(cells);
    }
    debug!("query finished (rows={}, columns={width})", out.len());
    Ok(Table::new(columns, out))
}

fn cell_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        // non-finite reals have no JSON form
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}

fn query_err(err: rusqlite::Error) -> EngineError {
    EngineError::Query(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{SqlRunner, SqliteRunner};
    use askql_rs_protocol::EngineError;
    use pretty_assertions::assert_eq;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    fn seeded_runner(dir: &tempfile::TempDir) -> SqliteRunner {
        let path = dir.path().join("music.sqlite");
        let conn = Connection::open(&path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE tracks (name TEXT, seconds INTEGER, price REAL, art BLOB);
             INSERT INTO tracks VALUES ('Aces High', 271, 0.99, x'CAFE');
             INSERT INTO tracks VALUES ('One', 447, NULL, NULL);",
        )
        .expect("seed db");
        SqliteRunner::new(path)
    }

    #[tokio::test]
    async fn maps_every_storage_class() {
        let dir = tempdir().expect("tempdir");
        let runner = seeded_runner(&dir);
        let table = runner
            .run("SELECT name, seconds, price, art FROM tracks ORDER BY seconds")
            .await
            .expect("query");

        assert_eq!(table.columns, vec!["name", "seconds", "price", "art"]);
        assert_eq!(
            table.rows,
            vec![
                vec![json!("Aces High"), json!(271), json!(0.99), json!("cafe")],
                vec![json!("One"), json!(447), Value::Null, Value::Null],
            ]
        );
    }

    #[tokio::test]
    async fn aliases_become_column_names() {
        let dir = tempdir().expect("tempdir");
        let runner = seeded_runner(&dir);
        let table = runner
            .run("SELECT COUNT(*) AS total FROM tracks")
            .await
            .expect("query");
        assert_eq!(table.columns, vec!["total"]);
        assert_eq!(table.rows, vec![vec![json!(2)]]);
    }

    #[tokio::test]
    async fn invalid_sql_is_a_query_error() {
        let dir = tempdir().expect("tempdir");
        let runner = seeded_runner(&dir);
        let err = runner
            .run("SELECT * FROM missing_table")
            .await
            .expect_err("should fail");
        match err {
            EngineError::Query(message) => assert!(message.contains("missing_table")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn join_with_overlapping_columns_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.sqlite");
        let conn = Connection::open(&path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE albums (AlbumId INTEGER, ArtistId INTEGER, Title TEXT);
             CREATE TABLE artists (ArtistId INTEGER, Name TEXT);
             INSERT INTO albums VALUES (10, 1, 'Back in Black');
             INSERT INTO artists VALUES (1, 'AC/DC');",
        )
        .expect("seed db");
        let runner = SqliteRunner::new(path);

        let err = runner
            .run("SELECT * FROM albums JOIN artists ON albums.ArtistId = artists.ArtistId")
            .await
            .expect_err("duplicate columns");
        match err {
            EngineError::Query(message) => {
                assert!(message.contains("columns must be unique"));
                assert!(message.contains("ArtistId"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let table = runner
            .run("SELECT Title, Name FROM albums JOIN artists ON albums.ArtistId = artists.ArtistId")
            .await
            .expect("explicit columns");
        assert_eq!(table.columns, vec!["Title", "Name"]);
    }

    #[tokio::test]
    async fn missing_database_file_is_not_created() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.sqlite");
        let runner = SqliteRunner::new(&path);
        let err = runner.run("SELECT 1").await.expect_err("should fail");
        assert!(matches!(err, EngineError::Query(_)));
        assert!(!path.exists());
    }
}
