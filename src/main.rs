use anyhow::Result;
use exec_sql::cli;
use pico_args::Arguments;
use std::io;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let status = cli::run(Arguments::from_env(), &mut io::stdout(), &mut io::stderr())?;

    Ok(ExitCode::from(status))
}
