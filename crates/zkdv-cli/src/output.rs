//! # Output Sinks
//!
//! Bytes go to a file verbatim or to stdout as hex; JSON is pretty-printed.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

/// Where binary output goes.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write raw bytes to this file instead of hex to stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

impl OutputArgs {
    /// Emit `bytes` to the configured sink.
    pub fn emit(&self, bytes: &[u8]) -> anyhow::Result<()> {
        match &self.out {
            Some(path) => {
                std::fs::write(path, bytes)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                tracing::info!(path = %path.display(), len = bytes.len(), "wrote output");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "0x{}", hex::encode(bytes))?;
            }
        }
        Ok(())
    }
}

/// Read a UTF-8 file with the path in the error.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Read a file as raw bytes, or as hex text when `as_hex` is set.
pub fn read_bytes(path: &Path, as_hex: bool) -> anyhow::Result<Vec<u8>> {
    if !as_hex {
        return std::fs::read(path).with_context(|| format!("cannot read {}", path.display()));
    }
    let text = read_text(path)?;
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).with_context(|| format!("{} is not valid hex", path.display()))
}

/// Pretty-print `value` to stdout.
pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_raw_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let hex_path = dir.path().join("proof.hex");
        std::fs::write(&hex_path, "0x0102ff\n").unwrap();
        assert_eq!(read_bytes(&hex_path, true).unwrap(), vec![1, 2, 255]);

        let raw_path = dir.path().join("proof.bin");
        std::fs::write(&raw_path, [9u8, 8, 7]).unwrap();
        assert_eq!(read_bytes(&raw_path, false).unwrap(), vec![9, 8, 7]);

        std::fs::write(&hex_path, "zz").unwrap();
        assert!(read_bytes(&hex_path, true).is_err());
    }

    #[test]
    fn emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        OutputArgs { out: Some(path.clone()) }.emit(&[1, 2, 3]).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
