// SPDX-License-Identifier: MPL-2.0
//! Host implementations that do not need a real window system.
//!
//! [`SystemLinkOpener`] shells out to the platform's default handler. The
//! headless types back the daemon when no compositor integration is wired
//! up, and double as recording test doubles.

use std::process::Command;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::debug;

use super::{FocusProbe, HostSurface, LinkOpener, PointerProbe};
use crate::error::Result;
use tiny_skia::Pixmap;

/// Opens links through the operating system's default handler.
#[derive(Debug, Default)]
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, uri: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        let mut command = {
            let mut c = Command::new("open");
            c.arg(uri);
            c
        };
        #[cfg(target_os = "windows")]
        let mut command = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", "", uri]);
            c
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut command = {
            let mut c = Command::new("xdg-open");
            c.arg(uri);
            c
        };

        command.spawn()?;
        Ok(())
    }
}

/// A surface that counts presentations instead of showing them.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    presented: AtomicUsize,
    topmost: AtomicBool,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn presented_frames(&self) -> usize {
        self.presented.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_topmost(&self) -> bool {
        self.topmost.load(Ordering::SeqCst)
    }
}

impl HostSurface for HeadlessSurface {
    fn present(&self, frame: &Pixmap) -> Result<()> {
        self.presented.fetch_add(1, Ordering::SeqCst);
        debug!(
            width = frame.width(),
            height = frame.height(),
            "presented frame"
        );
        Ok(())
    }

    fn set_topmost(&self, elevated: bool) -> Result<()> {
        self.topmost.store(elevated, Ordering::SeqCst);
        Ok(())
    }
}

/// A focus probe with a fixed answer. Headless runs treat the desktop as
/// always focused.
#[derive(Debug)]
pub struct StaticFocus(pub bool);

impl FocusProbe for StaticFocus {
    fn desktop_focused(&self) -> bool {
        self.0
    }
}

/// A pointer probe whose position is set programmatically.
#[derive(Debug, Default)]
pub struct StaticPointer {
    position: Mutex<(i32, i32)>,
}

impl StaticPointer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, x: i32, y: i32) {
        *self.position.lock().unwrap_or_else(|e| e.into_inner()) = (x, y);
    }
}

impl PointerProbe for StaticPointer {
    fn position(&self) -> (i32, i32) {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }
}
