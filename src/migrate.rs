use crate::error::Error;
use crate::error::Result;
use crate::target::DatabaseTarget;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::Level;
use tracing::debug;
use tracing::info;

/// The full text of a schema file.
#[derive(Debug)]
pub struct SchemaSource {
    path: PathBuf,
    text: String,
}

impl SchemaSource {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Applies the schema at `schema_path` to the database named by `sqlite_url`.
///
/// The schema is read before the database is opened, so an unreadable schema never creates or
/// touches a database file. Statements that ran before a failing one stay applied.
pub fn run(schema_path: &Path, sqlite_url: &str) -> Result<()> {
    let schema = SchemaSource::read(schema_path)?;
    info!(path = %schema.path().display(), bytes = schema.text().len(), "read schema");

    let target = DatabaseTarget::parse(sqlite_url);
    let conn = target.open()?;
    info!(%target, "opened database");

    apply(&conn, &schema)?;

    if tracing::enabled!(Level::DEBUG) {
        log_tables(&conn);
    }

    conn.close().map_err(|(_, e)| e)?;
    info!(%target, "closed database");

    Ok(())
}

/// Runs the schema as one script, in file order, then commits anything the script left open.
pub fn apply(conn: &Connection, schema: &SchemaSource) -> Result<()> {
    conn.execute_batch(schema.text())?;

    if !conn.is_autocommit() {
        debug!("committing transaction left open by the script");
        conn.execute_batch("COMMIT")?;
    }

    Ok(())
}

/// The schema is already applied by the time this runs, so a failed lookup is only logged.
fn log_tables(conn: &Connection) {
    match tables(conn) {
        Ok(tables) => debug!(?tables, "schema applied"),
        Err(e) => debug!(error = %e, "schema applied, can't list tables"),
    }
}

/// Names of the user tables in the database, sorted.
pub fn tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "
        SELECT name
        FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        ",
    )?;

    let iter = stmt.query_map([], |row| row.get(0))?;

    let r: std::result::Result<_, rusqlite::Error> = iter.collect();

    Ok(r?)
}
