use std::io::{self, Write};

use wsearch_core::Match;

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// One `file:line: preview` line per match
pub fn print_matches(matches: &[Match]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for m in matches {
        writeln!(out, "{}:{}: {}", m.file, m.line, m.preview)?;
    }
    Ok(())
}
