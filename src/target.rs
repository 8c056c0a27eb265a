use crate::error::Result;
use rusqlite::Connection;
use std::fmt;
use std::path::PathBuf;

/// Where the schema gets applied, resolved from the `--sqliteurl` value.
#[derive(Debug, PartialEq)]
pub enum DatabaseTarget {
    Memory,
    /// A `file:` URI, handed to SQLite as is.
    Uri(String),
    Path(PathBuf),
}

impl DatabaseTarget {
    /// Resolves a plain path, a `file:` URI, `:memory:`, or a `sqlite:` URL.
    ///
    /// URLs follow the usual `sqlite://` layout: `sqlite://` alone is in-memory,
    /// `sqlite:///data.db` is the relative path `data.db` and `sqlite:////var/data.db` is the
    /// absolute path `/var/data.db`.
    pub fn parse(url: &str) -> Self {
        if url == ":memory:" {
            return Self::Memory;
        }

        if url.starts_with("file:") {
            return Self::Uri(url.to_string());
        }

        if let Some(rest) = url.strip_prefix("sqlite://") {
            return match rest {
                "" | "/" | "/:memory:" => Self::Memory,
                // Empty host, so one slash separates it from the path
                _ => Self::Path(PathBuf::from(rest.strip_prefix('/').unwrap_or(rest))),
            };
        }

        if let Some(rest) = url.strip_prefix("sqlite:") {
            return match rest {
                "" | ":memory:" => Self::Memory,
                _ => Self::Path(PathBuf::from(rest)),
            };
        }

        Self::Path(PathBuf::from(url))
    }

    /// Opens a connection, creating the database file if it doesn't exist.
    pub fn open(&self) -> Result<Connection> {
        let conn = match self {
            Self::Memory => Connection::open_in_memory()?,
            // The default open flags include SQLITE_OPEN_URI
            Self::Uri(uri) => Connection::open(uri)?,
            Self::Path(path) => Connection::open(path)?,
        };

        Ok(conn)
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Memory => write!(f, ":memory:"),
            Self::Uri(uri) => write!(f, "{uri}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
