//! Command-line flags.

use crate::error::Error;
use crate::error::Result;
use pico_args::Arguments;
use std::path::PathBuf;

pub const USAGE: &str = "\
Applies a SQL schema file to a SQLite database.

USAGE:
  exec-sql --file <PATH> --sqliteurl <DATABASE>

OPTIONS:
  --file <PATH>           Path to the schema file to execute
  --sqliteurl <DATABASE>  Path or URL of the target SQLite database
  -v, --verbose           Log each step to stderr
  -h, --help              Print help
  -V, --version           Print version
";

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Version,
    Migrate(Opt),
}

#[derive(Debug, PartialEq)]
pub struct Opt {
    pub file: PathBuf,
    pub sqlite_url: String,
    pub verbose: bool,
}

pub fn parse(mut args: Arguments) -> Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    if args.contains(["-V", "--version"]) {
        return Ok(Command::Version);
    }

    let verbose = args.contains(["-v", "--verbose"]);
    let file: Option<PathBuf> = args.opt_value_from_str("--file")?;
    let sqlite_url: Option<String> = args.opt_value_from_str("--sqliteurl")?;

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(Error::UnexpectedArguments(
            rest.iter().map(|s| s.to_string_lossy().into_owned()).collect(),
        ));
    }

    match (file, sqlite_url) {
        (Some(file), Some(sqlite_url))
            if !file.as_os_str().is_empty() && !sqlite_url.is_empty() =>
        {
            Ok(Command::Migrate(Opt {
                file,
                sqlite_url,
                verbose,
            }))
        }
        (None, _) => Err(Error::MissingArgument("--file")),
        (Some(file), _) if file.as_os_str().is_empty() => Err(Error::MissingArgument("--file")),
        _ => Err(Error::MissingArgument("--sqliteurl")),
    }
}
