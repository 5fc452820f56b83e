//! CLI commands

pub mod check;
pub mod list;
pub mod routes;
pub mod show;

use anyhow::Result;
use serde::Serialize;

/// Pretty-print a value as JSON on stdout
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
