//! Input and output plumbing: files when a path is given, stdio otherwise.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;

/// Read raw bytes from `path`, or from stdin.
pub fn read_bytes(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read standard input")?;
            Ok(data)
        }
    }
}

/// Read encrypted text from `path`, or from stdin, with surrounding whitespace removed.
pub fn read_text(path: Option<&Path>) -> Result<String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            text
        }
    };
    Ok(text.trim().to_string())
}

/// Write bytes to `path`, or to stdout.
pub fn write_bytes(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("Failed to write output file {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|_| stdout.flush())
                .context("Failed to write standard output")
        }
    }
}
