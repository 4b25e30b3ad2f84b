// SPDX-License-Identifier: MIT

use std::fmt;

/// Frame geometry, inferred from the response type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Dim12,
    Dim24,
}

impl FrameKind {
    /// Mode detection policy. The low-nibble mapping has been confirmed
    /// against vendor tool traces for these six type bytes only; anything
    /// else is not pixel data.
    pub fn from_type_byte(type_byte: u8) -> Option<Self> {
        match type_byte {
            0x01 | 0x03 => Some(FrameKind::Dim12),
            0x02 | 0x12 | 0x22 | 0x32 => Some(FrameKind::Dim24),
            _ => None,
        }
    }

    pub fn side(self) -> usize {
        match self {
            FrameKind::Dim12 => 12,
            FrameKind::Dim24 => 24,
        }
    }
}

/// A captured square grid of per-pixel intensities.
///
/// The side length is fixed at the start of a capture and the grid is
/// rebuilt from scratch on every capture; no history is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    kind: FrameKind,
    pixels: Vec<i32>,
}

impl Frame {
    pub fn new(kind: FrameKind) -> Self {
        let side = kind.side();
        Self {
            kind,
            pixels: vec![0; side * side],
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn side(&self) -> usize {
        self.kind.side()
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.pixels[row * self.side() + col]
    }

    /// Overwrites one full row. Panics if `values` is not exactly one
    /// row wide; the codec always hands over full rows.
    pub(crate) fn set_row(&mut self, row: usize, values: &[i32]) {
        let side = self.side();
        assert_eq!(values.len(), side);
        self.pixels[row * side..(row + 1) * side].copy_from_slice(values);
    }

    /// Row-major copy of the grid, one `Vec` per row.
    pub fn rows(&self) -> Vec<Vec<i32>> {
        self.pixels
            .chunks(self.side())
            .map(|row| row.to_vec())
            .collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels.chunks(self.side()) {
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
