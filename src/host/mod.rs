// SPDX-License-Identifier: MPL-2.0
//! Boundaries to the host system.
//!
//! The overlay core only reacts: it presents frames through a
//! [`HostSurface`], asks a [`FocusProbe`] whether the desktop background
//! layer holds focus, polls a [`PointerProbe`] at tick time and hands link
//! activation to a [`LinkOpener`]. Real window-system plumbing lives
//! outside this crate; [`system`] ships the pieces that do not need one.

pub mod system;

use std::sync::mpsc;

use crate::error::Result;
use crate::overlay::interact::PointerEvent;
use tiny_skia::Pixmap;

/// The presentable overlay surface plus its stacking control.
pub trait HostSurface: Send + Sync {
    /// Atomically replaces the on-screen overlay with `frame`.
    fn present(&self, frame: &Pixmap) -> Result<()>;

    /// Raises or lowers the overlay's elevated stacking. A courtesy
    /// behavior; failures are logged, never fatal.
    fn set_topmost(&self, elevated: bool) -> Result<()>;
}

/// Whether the desktop background layer currently holds system focus.
/// Interaction is gated on this so clicks inside ordinary applications
/// never reach the toasts.
pub trait FocusProbe: Send + Sync {
    fn desktop_focused(&self) -> bool;
}

/// Current pointer position in overlay coordinates, polled at tick time
/// for hover evaluation.
pub trait PointerProbe: Send + Sync {
    fn position(&self) -> (i32, i32);
}

/// Opens a toast's activation link with the platform's default handler.
pub trait LinkOpener: Send + Sync {
    fn open(&self, uri: &str) -> Result<()>;
}

/// Hands translated pointer events from the input-observation thread to
/// the primary loop.
///
/// The observation callback must never process events itself; it clones
/// the sender once and re-posts, and the primary loop drains the queue on
/// every tick.
#[derive(Debug)]
pub struct EventQueue {
    sender: mpsc::Sender<PointerEvent>,
    receiver: mpsc::Receiver<PointerEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// A sender for the observation thread.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<PointerEvent> {
        self.sender.clone()
    }

    /// Drains every pending event into `f`, without blocking.
    pub fn drain(&self, mut f: impl FnMut(PointerEvent)) {
        for event in self.receiver.try_iter() {
            f(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::interact::PointerKind;

    #[test]
    fn events_cross_threads_in_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();

        let producer = std::thread::spawn(move || {
            for x in 0..3 {
                sender
                    .send(PointerEvent {
                        kind: PointerKind::Move,
                        x,
                        y: 0,
                        shift: false,
                        ctrl: false,
                    })
                    .unwrap();
            }
        });
        producer.join().unwrap();

        let mut seen = Vec::new();
        queue.drain(|event| seen.push(event.x));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn drain_on_empty_queue_is_a_noop() {
        let queue = EventQueue::new();
        let mut count = 0;
        queue.drain(|_| count += 1);
        assert_eq!(count, 0);
    }
}
