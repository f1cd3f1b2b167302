use serde::Serialize;
use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_serialized<T: Serialize>(value: &T) -> anyhow::Result<()> {
    print_json(&serde_json::to_string_pretty(value)?)?;
    Ok(())
}
