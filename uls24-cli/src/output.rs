// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uls24_hid::Frame;

/// Output encodings for captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Whitespace-separated grid, one line per row
    Text,
    /// JSON array of rows
    Json,
}

pub fn write_frame(frame: &Frame, path: &Path, format: OutputFormat) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create output file: {path:?}"))?;
    match format {
        OutputFormat::Text => {
            file.write_all(frame.to_string().as_bytes())
                .with_context(|| format!("Failed to write frame to {path:?}"))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut file, &frame.rows())
                .with_context(|| format!("Failed to write frame to {path:?}"))?;
            file.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uls24_hid::FrameKind;

    #[test]
    fn text_export_is_a_full_grid() {
        let frame = Frame::new(FrameKind::Dim12);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.txt");

        write_frame(&frame, &path, OutputFormat::Text).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 12);
        for line in lines {
            assert_eq!(line.split_whitespace().count(), 12);
        }
    }

    #[test]
    fn json_export_parses_back_to_rows() {
        let frame = Frame::new(FrameKind::Dim24);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.json");

        write_frame(&frame, &path, OutputFormat::Json).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<Vec<i32>> = serde_json::from_str(&content).unwrap();
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].len(), 24);
    }
}
