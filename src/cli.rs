//! Turns parsed flags into work and an exit status.

use crate::error::Error;
use crate::migrate;
use crate::opt;
use crate::opt::Command;
use anyhow::Result;
use pico_args::Arguments;
use std::io::Write;
use tracing_subscriber::EnvFilter;

pub const MISSING_ARGUMENT_MESSAGE: &str =
    "Please provide both schema file and SQLite database URL.";

/// Status for a command line that couldn't be used.
pub const USAGE_STATUS: u8 = 2;

/// Runs the command line in `args` and returns the process exit status.
///
/// Usage problems are reported on `out`/`err` and never touch the schema file or the database.
/// Failures while migrating are returned as errors.
pub fn run(args: Arguments, out: &mut impl Write, err: &mut impl Write) -> Result<u8> {
    let opt = match opt::parse(args) {
        Ok(Command::Help) => {
            write!(out, "{}", opt::USAGE)?;
            return Ok(0);
        }
        Ok(Command::Version) => {
            writeln!(out, "exec-sql {}", env!("CARGO_PKG_VERSION"))?;
            return Ok(0);
        }
        Ok(Command::Migrate(opt)) => opt,
        Err(Error::MissingArgument(_)) => {
            writeln!(out, "{MISSING_ARGUMENT_MESSAGE}")?;
            write!(err, "\n{}", opt::USAGE)?;
            return Ok(USAGE_STATUS);
        }
        Err(e) => {
            writeln!(err, "error: {e}\n")?;
            write!(err, "{}", opt::USAGE)?;
            return Ok(USAGE_STATUS);
        }
    };

    init_logging(opt.verbose);

    migrate::run(&opt.file, &opt.sqlite_url)?;

    Ok(0)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::tables;
    use rusqlite::Connection;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    fn run_args(args: &[String]) -> (Result<u8>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let status = run(
            Arguments::from_vec(args.iter().map(OsString::from).collect()),
            &mut out,
            &mut err,
        );

        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn missing_file_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("test.db");

        let (status, out, err) = run_args(&["--sqliteurl".into(), db.display().to_string()]);

        assert_eq!(status.unwrap(), USAGE_STATUS);
        assert_eq!(out, format!("{MISSING_ARGUMENT_MESSAGE}\n"));
        assert!(err.contains("USAGE:"));
        assert!(!db.exists());
    }

    #[test]
    fn missing_sqlite_url_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.sql");
        fs::write(&schema, "CREATE TABLE t (id INTEGER PRIMARY KEY);").unwrap();

        let (status, out, _) = run_args(&["--file".into(), schema.display().to_string()]);

        assert_eq!(status.unwrap(), USAGE_STATUS);
        assert_eq!(out, format!("{MISSING_ARGUMENT_MESSAGE}\n"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn stray_argument_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.sql");
        let db = dir.path().join("test.db");
        fs::write(&schema, "CREATE TABLE t (id INTEGER PRIMARY KEY);").unwrap();

        let (status, out, err) = run_args(&[
            format!("--file={}", schema.display()),
            format!("--sqliteurl={}", db.display()),
            "extra".into(),
        ]);

        assert_eq!(status.unwrap(), USAGE_STATUS);
        assert!(out.is_empty());
        assert!(err.starts_with("error: unexpected arguments: extra"));
        assert!(!db.exists());
    }

    #[test]
    fn help_and_version() {
        let (status, out, _) = run_args(&["--help".into()]);
        assert_eq!(status.unwrap(), 0);
        assert_eq!(out, opt::USAGE);

        let (status, out, _) = run_args(&["-V".into()]);
        assert_eq!(status.unwrap(), 0);
        assert!(out.starts_with("exec-sql "));
    }

    #[test]
    fn migrates_with_both_flags() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.sql");
        let db = dir.path().join("test.db");
        fs::write(&schema, "CREATE TABLE t (id INTEGER PRIMARY KEY);").unwrap();

        let (status, out, err) = run_args(&[
            "--file".into(),
            schema.display().to_string(),
            format!("--sqliteurl=sqlite:///{}", db.display()),
        ]);

        assert_eq!(status.unwrap(), 0);
        assert!(out.is_empty());
        assert!(err.is_empty());

        let conn = Connection::open(&db).unwrap();
        assert_eq!(tables(&conn).unwrap(), vec!["t".to_string()]);
    }

    #[test]
    fn migration_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("test.db");

        let (status, _, _) = run_args(&[
            "--file".into(),
            dir.path().join("missing.sql").display().to_string(),
            "--sqliteurl".into(),
            db.display().to_string(),
        ]);

        let e = status.unwrap_err();
        assert!(matches!(e.downcast_ref::<Error>(), Some(Error::Io { .. })));
        assert!(!db.exists());
    }
}
