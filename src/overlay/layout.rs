// SPDX-License-Identifier: MPL-2.0
//! Turns a toast request into box geometry and two pre-rendered surfaces.
//!
//! The box width is fixed; the height is accumulated bottom-up from the
//! title, body and image blocks. Both surfaces are painted from the same
//! shaped ops in one pass each, so hovering later is a bitmap swap and
//! never a re-layout.

use crate::error::{Error, Result};
use crate::image_handler::RasterImage;
use crate::render::painter::{self, CardStyle};
use crate::render::shaper::{DrawOp, ShapedText, TextAlign, TextShaper, TextStyle};

use super::toast::RenderedToast;

/// Extra leading multiplier on the title block.
const TITLE_LEADING: f32 = 1.25;
/// Vertical offset of the timestamp line inside the top margin.
const TIMESTAMP_TOP: f32 = 3.5;
/// Right inset of the timestamp line.
const TIMESTAMP_INSET: f32 = 8.0;

/// Fixed card geometry and type sizes. These are rendering constants, not
/// user configuration.
#[derive(Debug, Clone, Copy)]
pub struct LayoutMetrics {
    pub box_width: f32,
    /// Vertical budget of the overlay; image blocks must fit inside it.
    pub max_height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub timestamp_size: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            box_width: 350.0,
            max_height: f32::INFINITY,
            margin_top: 22.0,
            margin_right: 15.0,
            margin_bottom: 15.0,
            margin_left: 15.0,
            title_size: 26.0,
            body_size: 22.0,
            timestamp_size: 10.0,
        }
    }
}

impl LayoutMetrics {
    /// Box width minus the horizontal margins; the wrap and fit constraint
    /// for text and images.
    #[must_use]
    pub fn drawable_width(&self) -> f32 {
        self.box_width - self.margin_left - self.margin_right
    }
}

/// Geometry plus the two rendered surfaces, ready for insertion.
#[derive(Debug, Clone)]
pub struct LaidOutToast {
    pub width: u32,
    pub height: u32,
    pub surfaces: RenderedToast,
}

/// Computes card geometry and produces both surfaces.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
    normal: CardStyle,
    highlight: CardStyle,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            normal: CardStyle::normal(),
            highlight: CardStyle::highlighted(),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Lays out one toast. `stamp` is the pre-formatted arrival time drawn
    /// into the top margin band.
    ///
    /// Preconditions on `image`: its width already fits the drawable width
    /// and its height fits the remaining vertical budget. Both are enforced
    /// by the ingestion-side downscale; a violation here is a programming
    /// error, not a recoverable condition.
    pub fn layout(
        &self,
        shaper: &dyn TextShaper,
        title: &str,
        body: &str,
        image: Option<&RasterImage>,
        stamp: &str,
    ) -> Result<LaidOutToast> {
        let m = &self.metrics;
        let drawable = m.drawable_width();
        let mut height = m.margin_top;

        let stamp_block: ShapedText = shaper.shape(
            stamp,
            TextStyle::plain(m.timestamp_size).align(TextAlign::Trailing),
            m.box_width - TIMESTAMP_INSET,
        )?;

        let mut title_block: Option<(f32, ShapedText)> = None;
        if !title.is_empty() {
            let shaped = shaper.shape(title, TextStyle::glowing(m.title_size), drawable)?;
            let block_height = shaped.height * TITLE_LEADING;
            title_block = Some((height, shaped));
            height += block_height;
        }

        let mut body_block: Option<(f32, ShapedText)> = None;
        let mut last_line_height = 0.0;
        if !body.is_empty() {
            let shaped = shaper.shape(body, TextStyle::glowing(m.body_size), drawable)?;
            last_line_height = shaped.last_line_height;
            let block_height = shaped.height;
            body_block = Some((height, shaped));
            height += block_height;
        }

        let mut image_block: Option<(f32, f32, Vec<DrawOp>)> = None;
        if let Some(image) = image {
            debug_assert!(
                image.width as f32 <= drawable,
                "image must be pre-fitted to the drawable width"
            );
            debug_assert!(
                image.height as f32 <= m.max_height - height - m.margin_bottom,
                "image must fit the remaining vertical budget"
            );

            let pixmap = image
                .to_pixmap()
                .ok_or_else(|| Error::Backend("unable to allocate image surface".into()))?;
            let x = (m.box_width - image.width as f32) / 2.0;
            let y = height + last_line_height;
            image_block = Some((
                x,
                y,
                vec![DrawOp::ImageRun {
                    x: 0.0,
                    y: 0.0,
                    image: pixmap,
                }],
            ));
            height += last_line_height + image.height as f32;
        }

        height += m.margin_bottom;

        let width_px = m.box_width.ceil() as u32;
        let height_px = height.ceil() as u32;

        let paint = |style: &CardStyle| -> Result<tiny_skia::Pixmap> {
            let mut surface = painter::new_surface(width_px, height_px)?;
            painter::fill_rounded_rect(
                &mut surface,
                m.box_width,
                height,
                style.corner_radius,
                style.background,
            );
            painter::paint_ops(
                &mut surface,
                &stamp_block.ops,
                0.0,
                TIMESTAMP_TOP,
                style.accent,
                style.timestamp,
                style.glow_radius,
            );
            if let Some((y, shaped)) = &title_block {
                painter::paint_ops(
                    &mut surface,
                    &shaped.ops,
                    m.margin_left,
                    *y,
                    style.accent,
                    style.fill,
                    style.glow_radius,
                );
            }
            if let Some((y, shaped)) = &body_block {
                painter::paint_ops(
                    &mut surface,
                    &shaped.ops,
                    m.margin_left,
                    *y,
                    style.accent,
                    style.fill,
                    style.glow_radius,
                );
            }
            if let Some((x, y, ops)) = &image_block {
                painter::paint_ops(
                    &mut surface,
                    ops,
                    *x,
                    *y,
                    style.accent,
                    style.fill,
                    style.glow_radius,
                );
            }
            Ok(surface)
        };

        let surfaces = RenderedToast {
            normal: paint(&self.normal)?,
            highlight: paint(&self.highlight)?,
        };

        tracing::debug!(
            width = width_px,
            height = height_px,
            has_image = image.is_some(),
            "laid out toast"
        );

        Ok(LaidOutToast {
            width: width_px,
            height: height_px,
            surfaces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shaper::FixedMetricsShaper;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutMetrics::default())
    }

    fn shaper() -> FixedMetricsShaper {
        FixedMetricsShaper::new()
    }

    #[test]
    fn title_only_height_matches_formula() {
        let e = engine();
        let s = shaper();
        let m = *e.metrics();

        let laid = e.layout(&s, "Hello", "", None, "01-02 03:04:05").unwrap();

        let measured = s
            .shape("Hello", TextStyle::glowing(m.title_size), m.drawable_width())
            .unwrap()
            .height;
        let expected = (m.margin_top + measured * 1.25 + m.margin_bottom).ceil() as u32;
        assert_eq!(laid.height, expected);
        assert_eq!(laid.width, m.box_width.ceil() as u32);
    }

    #[test]
    fn body_adds_its_full_measured_height() {
        let e = engine();
        let s = shaper();
        let m = *e.metrics();

        let with_body = e.layout(&s, "Hi", "some body text", None, "stamp").unwrap();

        let title = s
            .shape("Hi", TextStyle::glowing(m.title_size), m.drawable_width())
            .unwrap()
            .height;
        let body = s
            .shape(
                "some body text",
                TextStyle::glowing(m.body_size),
                m.drawable_width(),
            )
            .unwrap()
            .height;
        let mut expected = m.margin_top;
        expected += title * 1.25;
        expected += body;
        expected += m.margin_bottom;
        assert_eq!(with_body.height, expected.ceil() as u32);
    }

    #[test]
    fn image_adds_line_gap_plus_image_height() {
        let e = engine();
        let s = shaper();
        let m = *e.metrics();

        let image = RasterImage::from_rgba(100, 60, vec![255; 100 * 60 * 4]).unwrap();
        let with = e.layout(&s, "", "body", Some(&image), "stamp").unwrap();

        let body = s
            .shape("body", TextStyle::glowing(m.body_size), m.drawable_width())
            .unwrap();
        let mut expected = m.margin_top;
        expected += body.height;
        expected += body.last_line_height + 60.0;
        expected += m.margin_bottom;
        assert_eq!(with.height, expected.ceil() as u32);
    }

    #[test]
    fn layout_is_deterministic() {
        let e = engine();
        let s = shaper();
        let image = RasterImage::from_rgba(50, 20, vec![200; 50 * 20 * 4]).unwrap();

        let a = e
            .layout(&s, "Title", "Body text", Some(&image), "01-02 03:04:05")
            .unwrap();
        let b = e
            .layout(&s, "Title", "Body text", Some(&image), "01-02 03:04:05")
            .unwrap();

        assert_eq!(a.height, b.height);
        assert_eq!(a.surfaces.normal.data(), b.surfaces.normal.data());
        assert_eq!(a.surfaces.highlight.data(), b.surfaces.highlight.data());
    }

    #[test]
    fn surfaces_share_dimensions_but_differ_in_accent() {
        let e = engine();
        let s = shaper();
        let laid = e.layout(&s, "Title", "", None, "stamp").unwrap();

        assert_eq!(laid.surfaces.normal.width(), laid.surfaces.highlight.width());
        assert_eq!(
            laid.surfaces.normal.height(),
            laid.surfaces.highlight.height()
        );
        // The glow accent differs, so the rendered bytes must too.
        assert_ne!(laid.surfaces.normal.data(), laid.surfaces.highlight.data());
    }
}
