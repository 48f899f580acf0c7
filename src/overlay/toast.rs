// SPDX-License-Identifier: MPL-2.0
//! Core toast data structures.

use crate::image_handler::RasterImage;
use std::fmt;
use std::time::Duration;
use tiny_skia::Pixmap;

/// Unique identifier for a toast.
///
/// Ids are assigned at insertion, start at 1, increase strictly and are
/// never reused within a process. Failed insertions do not consume an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(i64);

impl ToastId {
    pub(crate) fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw id handed back to ingestion callers.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ephemeral toast request as it arrives from the ingestion boundary.
///
/// At least one of `title`/`body` must be non-empty for the request to be
/// accepted.
#[derive(Debug, Clone, Default)]
pub struct ToastRequest {
    pub title: String,
    pub body: String,
    pub image: Option<RasterImage>,
    pub link: Option<String>,
}

/// The pre-rendered surfaces of one toast: same geometry, different accent.
///
/// Owned solely by their [`Toast`]; nothing else in the system aliases
/// them. Hover feedback is a swap between the two, never a re-render.
#[derive(Debug, Clone)]
pub struct RenderedToast {
    pub normal: Pixmap,
    pub highlight: Pixmap,
}

/// A notification card living in the store. Immutable once constructed;
/// only removal from the store mutates the system.
#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    width: u32,
    height: u32,
    /// Monotonic insertion time, relative to the overlay epoch.
    created: Duration,
    surfaces: RenderedToast,
    link: Option<String>,
}

impl Toast {
    pub(crate) fn new(
        id: ToastId,
        width: u32,
        height: u32,
        created: Duration,
        surfaces: RenderedToast,
        link: Option<String>,
    ) -> Self {
        Self {
            id,
            width,
            height,
            created,
            surfaces,
            link,
        }
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn created(&self) -> Duration {
        self.created
    }

    #[must_use]
    pub fn surfaces(&self) -> &RenderedToast {
        &self.surfaces
    }

    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Whether `(x, y)` falls inside this toast's box when its top-left
    /// corner sits at `(left, top)`.
    #[must_use]
    pub fn contains(&self, left: f32, top: f32, x: i32, y: i32) -> bool {
        let (x, y) = (x as f32, y as f32);
        x >= left && x <= left + self.width as f32 && y >= top && y <= top + self.height as f32
    }
}
