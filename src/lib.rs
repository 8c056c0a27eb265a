//! Applies a SQL schema file to a SQLite database in one shot.

pub mod cli;
pub mod error;
pub mod migrate;
pub mod opt;
pub mod target;

pub use error::Error;
pub use error::Result;
pub use migrate::run;
