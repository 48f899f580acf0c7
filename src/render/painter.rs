// SPDX-License-Identifier: MPL-2.0
//! The single non-virtual paint routine.
//!
//! Interprets the shaper's [`DrawOp`] list onto a `tiny_skia` pixmap. The
//! two card states share every op; only the colors handed to
//! [`paint_ops`] differ between them.

use crate::error::{Error, Result};
use crate::render::shaper::{CoverageMask, DrawOp};
use tiny_skia::{
    Color, FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

/// Colors and geometry for painting one card state.
#[derive(Debug, Clone, Copy)]
pub struct CardStyle {
    pub background: Color,
    /// Glow accent; this is the only field that differs between the normal
    /// and highlighted surfaces.
    pub accent: Color,
    pub fill: Color,
    pub timestamp: Color,
    pub corner_radius: f32,
    pub glow_radius: f32,
}

impl CardStyle {
    /// Resting card: cool blue glow.
    #[must_use]
    pub fn normal() -> Self {
        Self {
            background: Color::from_rgba8(0, 0, 0, 191),
            accent: Color::from_rgba8(0, 128, 191, 128),
            fill: Color::from_rgba8(255, 255, 255, 255),
            timestamp: Color::from_rgba8(255, 255, 255, 217),
            corner_radius: 7.0,
            glow_radius: 8.0,
        }
    }

    /// Hovered card: warm red glow, everything else identical.
    #[must_use]
    pub fn highlighted() -> Self {
        Self {
            accent: Color::from_rgba8(255, 64, 64, 128),
            ..Self::normal()
        }
    }
}

/// Allocates a transparent card surface.
pub fn new_surface(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width.max(1), height.max(1)).ok_or_else(|| {
        Error::Backend(format!("unable to allocate {}x{} surface", width, height))
    })
}

/// Fills the card background as a rounded rectangle.
pub fn fill_rounded_rect(pixmap: &mut Pixmap, width: f32, height: f32, radius: f32, color: Color) {
    let Some(path) = rounded_rect_path(width, height, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}

/// Interprets a block's ops at offset `(dx, dy)`.
///
/// `accent` tints outline strokes, `fill` tints filled runs; image runs are
/// blitted unchanged.
pub fn paint_ops(
    pixmap: &mut Pixmap,
    ops: &[DrawOp],
    dx: f32,
    dy: f32,
    accent: Color,
    fill: Color,
    glow_radius: f32,
) {
    for op in ops {
        match op {
            DrawOp::OutlineStroke(run) => {
                let radius = glow_radius.max(0.0) as u32;
                let grown = dilate(&run.mask, radius);
                if let Some(tinted) = tint_mask(&grown, accent) {
                    pixmap.draw_pixmap(
                        (dx + run.x - radius as f32) as i32,
                        (dy + run.y - radius as f32) as i32,
                        tinted.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            }
            DrawOp::FilledRun(run) => {
                if let Some(tinted) = tint_mask(&run.mask, fill) {
                    pixmap.draw_pixmap(
                        (dx + run.x) as i32,
                        (dy + run.y) as i32,
                        tinted.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            }
            DrawOp::ImageRun { x, y, image } => {
                pixmap.draw_pixmap(
                    (dx + x) as i32,
                    (dy + y) as i32,
                    image.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

fn rounded_rect_path(width: f32, height: f32, radius: f32) -> Option<tiny_skia::Path> {
    // Circle-to-bezier arc constant.
    const K: f32 = 0.552_284_8;

    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let k = K * r;
    let (w, h) = (width, height);

    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.cubic_to(w - r + k, 0.0, w, r - k, w, r);
    pb.line_to(w, h - r);
    pb.cubic_to(w, h - r + k, w - r + k, h, w - r, h);
    pb.line_to(r, h);
    pb.cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

/// Tints a coverage mask into a premultiplied pixmap.
fn tint_mask(mask: &CoverageMask, color: Color) -> Option<Pixmap> {
    if mask.width == 0 || mask.height == 0 {
        return None;
    }
    let c = color.to_color_u8();
    let mut data = Vec::with_capacity(mask.data.len() * 4);
    for &coverage in &mask.data {
        let a = (coverage as u16 * c.alpha() as u16 / 255) as u8;
        data.push((c.red() as u16 * a as u16 / 255) as u8);
        data.push((c.green() as u16 * a as u16 / 255) as u8);
        data.push((c.blue() as u16 * a as u16 / 255) as u8);
        data.push(a);
    }
    Pixmap::from_vec(data, IntSize::from_wh(mask.width, mask.height)?)
}

/// Grows coverage outward by `radius` pixels (separable max filter). The
/// result is larger than the input by `radius` on every side.
fn dilate(mask: &CoverageMask, radius: u32) -> CoverageMask {
    if radius == 0 {
        return mask.clone();
    }
    let r = radius as i64;
    let out_w = mask.width as i64 + 2 * r;
    let out_h = mask.height as i64 + 2 * r;

    // Horizontal pass.
    let mut horizontal = vec![0u8; (out_w * mask.height as i64) as usize];
    for y in 0..mask.height as i64 {
        for x in 0..out_w {
            let mut best = 0u8;
            for sx in (x - 2 * r)..=x {
                if sx >= 0 && sx < mask.width as i64 {
                    best = best.max(mask.data[(y * mask.width as i64 + sx) as usize]);
                }
            }
            horizontal[(y * out_w + x) as usize] = best;
        }
    }

    // Vertical pass.
    let mut out = CoverageMask::new(out_w as u32, out_h as u32);
    for y in 0..out_h {
        for x in 0..out_w {
            let mut best = 0u8;
            for sy in (y - 2 * r)..=y {
                if sy >= 0 && sy < mask.height as i64 {
                    best = best.max(horizontal[(sy * out_w + x) as usize]);
                }
            }
            out.data[(y * out_w + x) as usize] = best;
        }
    }
    out
}
