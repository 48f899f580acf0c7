// SPDX-License-Identifier: MPL-2.0
//! The text-shaping seam.
//!
//! The overlay never talks to a font stack directly. A [`TextShaper`]
//! measures wrapped text and emits a closed set of [`DrawOp`]s; the painter
//! interprets those ops without knowing anything about glyphs. Hosts with a
//! platform text stack plug in their own shaper; [`FixedMetricsShaper`] is
//! the built-in deterministic fallback that renders runs as greeked bars.

use crate::error::{Error, Result};

/// Horizontal placement of each wrapped line within the wrap width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Leading,
    Trailing,
}

/// Parameters a shaper needs for one block of text.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Em size in pixels.
    pub size: f32,
    /// Whether the painter should draw a glow outline behind the runs.
    pub glow: bool,
    pub align: TextAlign,
}

impl TextStyle {
    #[must_use]
    pub fn glowing(size: f32) -> Self {
        Self {
            size,
            glow: true,
            align: TextAlign::Leading,
        }
    }

    #[must_use]
    pub fn plain(size: f32) -> Self {
        Self {
            size,
            glow: false,
            align: TextAlign::Leading,
        }
    }

    #[must_use]
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// An 8-bit coverage mask, one byte per pixel, tightly packed rows.
#[derive(Debug, Clone)]
pub struct CoverageMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CoverageMask {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, coverage: u8) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                self.data[row + x as usize] = coverage;
            }
        }
    }
}

/// One positioned run of glyph coverage, relative to the block origin.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub x: f32,
    pub y: f32,
    pub mask: CoverageMask,
}

/// The closed set of operations a shaper may emit.
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// Glow outline behind a run, painted in the surface accent color.
    OutlineStroke(GlyphRun),
    /// The filled glyphs of a run, painted in the foreground color.
    FilledRun(GlyphRun),
    /// An inline raster (color emoji and the like), blitted as-is.
    ImageRun {
        x: f32,
        y: f32,
        image: tiny_skia::Pixmap,
    },
}

/// Wrapped, measured text plus the ops to paint it.
#[derive(Debug, Clone)]
pub struct ShapedText {
    /// Widest line, in pixels.
    pub width: f32,
    /// Total measured height of all wrapped lines.
    pub height: f32,
    /// Height of the last visual line; the layout uses it as the gap in
    /// front of an image block.
    pub last_line_height: f32,
    pub ops: Vec<DrawOp>,
}

/// The opaque text collaborator consumed by layout and painting.
pub trait TextShaper: Send + Sync {
    /// Wraps `text` against `max_width` and produces measured geometry plus
    /// paint ops. Fails with [`Error::Backend`] when shaping resources
    /// cannot be allocated.
    fn shape(&self, text: &str, style: TextStyle, max_width: f32) -> Result<ShapedText>;
}

/// Deterministic fallback shaper with fixed monospace metrics.
///
/// Every character advances `0.6 em` and every line is `1.3 em` tall;
/// glyphs are greeked as solid bars. Identical inputs always produce
/// identical geometry, which is what the layout tests rely on.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedMetricsShaper;

impl FixedMetricsShaper {
    const ADVANCE_EM: f32 = 0.6;
    const LINE_HEIGHT_EM: f32 = 1.3;

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TextShaper for FixedMetricsShaper {
    fn shape(&self, text: &str, style: TextStyle, max_width: f32) -> Result<ShapedText> {
        if !(style.size > 0.0) || !(max_width > 0.0) {
            return Err(Error::Backend(format!(
                "cannot shape text at size {} within width {}",
                style.size, max_width
            )));
        }

        let advance = style.size * Self::ADVANCE_EM;
        let line_height = style.size * Self::LINE_HEIGHT_EM;
        let max_chars = ((max_width / advance).floor() as usize).max(1);

        // Greedy wrap: paragraphs on '\n', then fixed-width chunks.
        let mut lines: Vec<Vec<char>> = Vec::new();
        for paragraph in text.split('\n') {
            let chars: Vec<char> = paragraph.chars().filter(|c| *c != '\r').collect();
            if chars.is_empty() {
                lines.push(Vec::new());
                continue;
            }
            for chunk in chars.chunks(max_chars) {
                lines.push(chunk.to_vec());
            }
        }
        if lines.is_empty() {
            lines.push(Vec::new());
        }

        let mask_height = line_height.ceil() as u32;
        let bar_top = (line_height * 0.25) as u32;
        let bar_bottom = (line_height * 0.85).ceil() as u32;

        let mut width = 0f32;
        let mut ops = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let line_width = line.len() as f32 * advance;
            width = width.max(line_width);
            if line.is_empty() {
                continue;
            }

            let mut mask = CoverageMask::new(line_width.ceil() as u32, mask_height);
            for (i, c) in line.iter().enumerate() {
                if c.is_whitespace() {
                    continue;
                }
                let x0 = (i as f32 * advance) as u32;
                let x1 = (i as f32 * advance + advance * 0.8).ceil() as u32;
                mask.fill_rect(x0, bar_top, x1, bar_bottom, 255);
            }

            let x = match style.align {
                TextAlign::Leading => 0.0,
                TextAlign::Trailing => max_width - line_width,
            };
            let run = GlyphRun {
                x,
                y: index as f32 * line_height,
                mask,
            };
            if style.glow {
                ops.push(DrawOp::OutlineStroke(run.clone()));
            }
            ops.push(DrawOp::FilledRun(run));
        }

        Ok(ShapedText {
            width,
            height: lines.len() as f32 * line_height,
            last_line_height: line_height,
            ops,
        })
    }
}
