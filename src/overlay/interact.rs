// SPDX-License-Identifier: MPL-2.0
//! Maps pointer and modifier state to dismiss/activate actions.
//!
//! Events arrive from a system-wide observation channel, so they fire even
//! though the overlay never holds input focus. Actions are gated on the
//! desktop background layer having focus; that keeps a click inside an
//! ordinary application from dismissing anything.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::host::{FocusProbe, LinkOpener};

use super::store::ToastStore;
use super::toast::Toast;

/// A translated pointer event, as re-posted from the observation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    LeftDown,
    LeftUp,
    RightDown,
    RightUp,
    MiddleDown,
    MiddleUp,
}

#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
    pub shift: bool,
    pub ctrl: bool,
}

/// Walks the display stack front-to-back and returns the first toast whose
/// box contains the pointer. With overlapping boxes the newest wins.
pub(crate) fn hit_test<'a>(
    toasts: impl Iterator<Item = &'a Toast>,
    origin: (f32, f32),
    gap: f32,
    x: i32,
    y: i32,
) -> Option<&'a Toast> {
    let (left, mut top) = origin;
    for toast in toasts {
        if toast.contains(left, top, x, y) {
            return Some(toast);
        }
        top += toast.height() as f32 + gap;
    }
    None
}

/// Translates gated pointer gestures into store mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    origin: (f32, f32),
    gap: f32,
}

impl InteractionController {
    #[must_use]
    pub fn new(origin: (f32, f32), gap: f32) -> Self {
        Self { origin, gap }
    }

    /// Processes one pointer event against the store.
    ///
    /// Shift + left-click dismisses the hit toast. Ctrl + left-click opens
    /// its link on a detached worker and keeps the toast. Unmodified clicks
    /// do nothing; hover feedback is the compositor's business.
    pub fn on_pointer(
        &self,
        store: &ToastStore,
        event: PointerEvent,
        focus: &dyn FocusProbe,
        opener: &Arc<dyn LinkOpener>,
    ) {
        if event.kind != PointerKind::LeftDown || !focus.desktop_focused() {
            return;
        }
        if !event.shift && !event.ctrl {
            return;
        }

        let hit = store.snapshot(|toasts| {
            hit_test(toasts.iter(), self.origin, self.gap, event.x, event.y)
                .map(|t| (t.id(), t.link().map(str::to_owned)))
        });
        let Some((id, link)) = hit else {
            return;
        };

        if event.shift {
            debug!(%id, "dismissing toast");
            store.remove(id);
        } else if event.ctrl {
            let Some(link) = link else {
                return;
            };
            debug!(%id, link, "activating toast link");
            let opener = Arc::clone(opener);
            std::thread::spawn(move || {
                if let Err(e) = opener.open(&link) {
                    warn!(link, error = %e, "failed to open toast link");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::overlay::layout::LaidOutToast;
    use crate::overlay::toast::RenderedToast;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;
    use tiny_skia::Pixmap;

    struct Focused(bool);
    impl FocusProbe for Focused {
        fn desktop_focused(&self) -> bool {
            self.0
        }
    }

    struct RecordingOpener(Mutex<mpsc::Sender<String>>);
    impl LinkOpener for RecordingOpener {
        fn open(&self, uri: &str) -> Result<()> {
            self.0
                .lock()
                .unwrap()
                .send(uri.to_string())
                .expect("test receiver dropped");
            Ok(())
        }
    }

    fn laid_out(height: u32) -> LaidOutToast {
        let pixmap = Pixmap::new(100, height).unwrap();
        LaidOutToast {
            width: 100,
            height,
            surfaces: RenderedToast {
                normal: pixmap.clone(),
                highlight: pixmap,
            },
        }
    }

    fn left_down(x: i32, y: i32, shift: bool, ctrl: bool) -> PointerEvent {
        PointerEvent {
            kind: PointerKind::LeftDown,
            x,
            y,
            shift,
            ctrl,
        }
    }

    fn controller() -> InteractionController {
        InteractionController::new((0.0, 0.0), 10.0)
    }

    fn opener_pair() -> (Arc<dyn LinkOpener>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(RecordingOpener(Mutex::new(tx))), rx)
    }

    #[test]
    fn shift_click_dismisses_only_the_hit_toast() {
        let store = ToastStore::new();
        let ids: Vec<_> = (0..5)
            .map(|_| store.insert(laid_out(40), Duration::ZERO, None))
            .collect();
        let (opener, _rx) = opener_pair();

        // Stack: ids[4] at y 0..40, ids[3] at 50..90, ids[2] at 100..140, ...
        controller().on_pointer(&store, left_down(50, 120, true, false), &Focused(true), &opener);

        assert_eq!(store.len(), 4);
        store.snapshot(|toasts| {
            let listed: Vec<_> = toasts.iter().map(Toast::id).collect();
            assert_eq!(listed, vec![ids[4], ids[3], ids[1], ids[0]]);
        });
    }

    #[test]
    fn ctrl_click_opens_link_exactly_once_and_keeps_toast() {
        let store = ToastStore::new();
        store.insert(
            laid_out(40),
            Duration::ZERO,
            Some("https://example.com".to_string()),
        );
        let (opener, rx) = opener_pair();

        controller().on_pointer(&store, left_down(10, 10, false, true), &Focused(true), &opener);

        let opened = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("opener was not invoked");
        assert_eq!(opened, "https://example.com");
        assert!(rx.try_recv().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn events_are_ignored_without_desktop_focus() {
        let store = ToastStore::new();
        store.insert(laid_out(40), Duration::ZERO, None);
        let (opener, _rx) = opener_pair();

        controller().on_pointer(&store, left_down(10, 10, true, false), &Focused(false), &opener);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unmodified_clicks_do_nothing() {
        let store = ToastStore::new();
        store.insert(laid_out(40), Duration::ZERO, None);
        let (opener, rx) = opener_pair();

        controller().on_pointer(&store, left_down(10, 10, false, false), &Focused(true), &opener);
        assert_eq!(store.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clicks_outside_every_box_are_ignored() {
        let store = ToastStore::new();
        store.insert(laid_out(40), Duration::ZERO, None);
        let (opener, _rx) = opener_pair();

        controller().on_pointer(&store, left_down(500, 500, true, false), &Focused(true), &opener);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ctrl_click_without_link_is_a_noop() {
        let store = ToastStore::new();
        store.insert(laid_out(40), Duration::ZERO, None);
        let (opener, rx) = opener_pair();

        controller().on_pointer(&store, left_down(10, 10, false, true), &Focused(true), &opener);
        assert!(rx.try_recv().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn hit_test_prefers_the_newest_on_overlap() {
        // Zero gap and zero height force every box to overlap at the top.
        let store = ToastStore::new();
        let _older = store.insert(laid_out(40), Duration::ZERO, None);
        let newer = store.insert(laid_out(40), Duration::ZERO, None);

        store.snapshot(|toasts| {
            let hit = hit_test(toasts.iter(), (0.0, 0.0), -40.0, 10, 10).unwrap();
            assert_eq!(hit.id(), newer);
        });
    }
}
