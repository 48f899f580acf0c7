// SPDX-License-Identifier: MPL-2.0
//! Paints the visible toast stack onto the presentable overlay frame.
//!
//! The compositor only works when the store is dirty. Hover state is
//! recomputed from the live pointer position on every pass and never
//! persisted on a toast.

use crate::error::Result;
use crate::render::painter;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use super::interact::hit_test;
use super::store::ToastStore;
use super::toast::ToastId;

pub struct RenderCompositor {
    origin: (f32, f32),
    gap: f32,
    viewport_height: u32,
    frame: Pixmap,
    /// Toast currently under the pointer, if any. Ephemeral.
    hover: Option<ToastId>,
}

impl RenderCompositor {
    pub fn new(
        viewport_width: u32,
        viewport_height: u32,
        origin: (f32, f32),
        gap: f32,
    ) -> Result<Self> {
        Ok(Self {
            origin,
            gap,
            viewport_height,
            frame: painter::new_surface(viewport_width, viewport_height)?,
            hover: None,
        })
    }

    #[must_use]
    pub fn hover(&self) -> Option<ToastId> {
        self.hover
    }

    /// Re-derives which toast the pointer is over; a transition in either
    /// direction marks the store dirty so the next pass repaints.
    pub fn poll_hover(&mut self, store: &ToastStore, pointer: (i32, i32)) {
        let hit = store.snapshot(|toasts| {
            hit_test(toasts.iter(), self.origin, self.gap, pointer.0, pointer.1).map(|t| t.id())
        });
        if hit != self.hover {
            self.hover = hit;
            store.mark_dirty();
        }
    }

    /// Repaints the stack if the store is dirty and returns the finished
    /// frame for presentation; returns `None` when there is nothing to do.
    ///
    /// Toasts are placed newest-first from the anchor downward; once the
    /// next card would exceed the viewport the rest are simply not painted
    /// this frame.
    pub fn compose(&mut self, store: &ToastStore, pointer: (i32, i32)) -> Option<&Pixmap> {
        if !store.take_dirty() {
            return None;
        }

        self.frame.fill(Color::TRANSPARENT);

        let (left, origin_top) = self.origin;
        let gap = self.gap;
        let viewport_height = self.viewport_height as f32;
        let frame = &mut self.frame;

        store.snapshot(|toasts| {
            let mut top = origin_top;
            for toast in toasts {
                if top + toast.height() as f32 > viewport_height {
                    break;
                }
                let surfaces = toast.surfaces();
                let bitmap = if toast.contains(left, top, pointer.0, pointer.1) {
                    &surfaces.highlight
                } else {
                    &surfaces.normal
                };
                frame.draw_pixmap(
                    left as i32,
                    top as i32,
                    bitmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
                top += toast.height() as f32 + gap;
            }
        });

        Some(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::layout::LaidOutToast;
    use crate::overlay::toast::RenderedToast;
    use std::time::Duration;
    use tiny_skia::Pixmap;

    fn laid_out(height: u32, normal_alpha: u8) -> LaidOutToast {
        let mut normal = Pixmap::new(100, height).unwrap();
        normal.fill(Color::from_rgba8(255, 255, 255, normal_alpha));
        let mut highlight = Pixmap::new(100, height).unwrap();
        highlight.fill(Color::from_rgba8(255, 0, 0, 255));
        LaidOutToast {
            width: 100,
            height,
            surfaces: RenderedToast { normal, highlight },
        }
    }

    fn compositor() -> RenderCompositor {
        RenderCompositor::new(400, 300, (0.0, 0.0), 10.0).unwrap()
    }

    fn pixel(frame: &Pixmap, x: u32, y: u32) -> tiny_skia::PremultipliedColorU8 {
        frame.pixels()[(y * frame.width() + x) as usize]
    }

    #[test]
    fn clean_store_composes_nothing() {
        let store = ToastStore::new();
        let mut comp = compositor();
        assert!(comp.compose(&store, (0, 0)).is_none());
    }

    #[test]
    fn dirty_store_composes_once_then_goes_clean() {
        let store = ToastStore::new();
        store.insert(laid_out(40, 255), Duration::ZERO, None);
        let mut comp = compositor();

        assert!(comp.compose(&store, (-1, -1)).is_some());
        assert!(comp.compose(&store, (-1, -1)).is_none());
    }

    #[test]
    fn toasts_are_stacked_with_gaps() {
        let store = ToastStore::new();
        store.insert(laid_out(40, 255), Duration::ZERO, None);
        store.insert(laid_out(40, 255), Duration::ZERO, None);
        let mut comp = compositor();

        let frame = comp.compose(&store, (-1, -1)).unwrap();
        // First card covers rows 0..40, gap 40..50, second card 50..90.
        assert_eq!(pixel(frame, 10, 10).alpha(), 255);
        assert_eq!(pixel(frame, 10, 45).alpha(), 0);
        assert_eq!(pixel(frame, 10, 60).alpha(), 255);
    }

    #[test]
    fn hovered_toast_uses_highlight_surface() {
        let store = ToastStore::new();
        store.insert(laid_out(40, 255), Duration::ZERO, None);
        let mut comp = compositor();

        let frame = comp.compose(&store, (10, 10)).unwrap();
        let px = pixel(frame, 10, 10);
        // Highlight surface is pure red.
        assert_eq!(px.red(), 255);
        assert_eq!(px.green(), 0);
    }

    #[test]
    fn overflow_toasts_are_skipped_not_removed() {
        let store = ToastStore::new();
        for _ in 0..4 {
            store.insert(laid_out(100, 255), Duration::ZERO, None);
        }
        let mut comp = compositor();

        // Viewport is 300 tall; cards at 0..100, 110..210 fit, the third
        // would end at 320 and is skipped along with the fourth.
        let frame = comp.compose(&store, (-1, -1)).unwrap();
        assert_eq!(pixel(frame, 10, 150).alpha(), 255);
        assert_eq!(pixel(frame, 10, 250).alpha(), 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn hover_transition_marks_dirty() {
        let store = ToastStore::new();
        store.insert(laid_out(40, 255), Duration::ZERO, None);
        let mut comp = compositor();
        comp.compose(&store, (-1, -1));
        assert!(!store.is_dirty());

        comp.poll_hover(&store, (10, 10));
        assert!(store.is_dirty());
        assert!(comp.hover().is_some());

        // Leaving the box is a transition too.
        store.take_dirty();
        comp.poll_hover(&store, (-1, -1));
        assert!(store.is_dirty());
        assert!(comp.hover().is_none());

        // No transition, no invalidation.
        store.take_dirty();
        comp.poll_hover(&store, (-1, -1));
        assert!(!store.is_dirty());
    }
}
