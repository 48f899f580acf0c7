// SPDX-License-Identifier: MPL-2.0
//! The toast overlay core.
//!
//! [`OverlayContext`] is the explicit context object wiring the store, the
//! layout engine, the compositor, the interaction controller and the
//! scheduler together. It is constructed once at startup and shared by
//! reference with the ingestion boundary and the host loop; there is no
//! process-wide singleton.

pub mod compose;
pub mod interact;
pub mod layout;
pub mod schedule;
pub mod store;
pub mod toast;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{
    Config, DEFAULT_TICK_INTERVAL_MS, DEFAULT_TOPMOST_SECS, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use crate::error::{Error, Result};
use crate::host::{FocusProbe, HostSurface, LinkOpener, PointerProbe};
use crate::image_handler::transform;
use crate::render::shaper::TextShaper;

use compose::RenderCompositor;
use interact::{InteractionController, PointerEvent};
use layout::{LayoutEngine, LayoutMetrics};
use schedule::Scheduler;
use store::ToastStore;
use toast::{ToastId, ToastRequest};

/// Arrival time drawn into each card's top margin band.
const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";

/// Distance of the default stack anchor from the viewport's right edge.
const DEFAULT_ANCHOR_INSET: f32 = 50.0;

/// Resolved overlay geometry and timing.
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    pub metrics: LayoutMetrics,
    pub viewport: (u32, u32),
    /// Top-left corner of the stack; `None` anchors near the top-right
    /// viewport corner.
    pub anchor: Option<(f32, f32)>,
    /// Vertical gap between stacked cards.
    pub gap: f32,
    pub tick_interval: Duration,
    pub topmost_for: Duration,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        let metrics = LayoutMetrics {
            max_height: DEFAULT_VIEWPORT_HEIGHT as f32,
            ..LayoutMetrics::default()
        };
        Self {
            gap: metrics.margin_bottom,
            metrics,
            viewport: (DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            anchor: None,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            topmost_for: Duration::from_secs_f32(DEFAULT_TOPMOST_SECS),
        }
    }
}

impl OverlayOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let viewport = (
            config.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH),
            config.viewport_height.unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
        );
        let metrics = LayoutMetrics {
            max_height: viewport.1 as f32,
            ..LayoutMetrics::default()
        };
        let anchor = match (config.anchor_x, config.anchor_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        };
        Self {
            gap: metrics.margin_bottom,
            metrics,
            viewport,
            anchor,
            tick_interval: Duration::from_millis(
                config.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS),
            ),
            topmost_for: Duration::from_secs_f32(
                config.topmost_secs.unwrap_or(DEFAULT_TOPMOST_SECS),
            ),
        }
    }

    fn resolved_anchor(&self) -> (f32, f32) {
        self.anchor.unwrap_or((
            self.viewport.0 as f32 - self.metrics.box_width - DEFAULT_ANCHOR_INSET,
            DEFAULT_ANCHOR_INSET,
        ))
    }
}

/// The boundary implementations the context consumes.
pub struct OverlayBackends {
    pub shaper: Box<dyn TextShaper>,
    pub surface: Arc<dyn HostSurface>,
    pub focus: Arc<dyn FocusProbe>,
    pub pointer: Arc<dyn PointerProbe>,
    pub opener: Arc<dyn LinkOpener>,
}

impl OverlayBackends {
    /// Headless wiring: deterministic shaper, counting surface, desktop
    /// always focused. What the daemon runs with when no window-system
    /// integration is attached.
    #[must_use]
    pub fn headless() -> Self {
        use crate::host::system::{HeadlessSurface, StaticFocus, StaticPointer, SystemLinkOpener};
        use crate::render::shaper::FixedMetricsShaper;
        Self {
            shaper: Box::new(FixedMetricsShaper::new()),
            surface: Arc::new(HeadlessSurface::new()),
            focus: Arc::new(StaticFocus(true)),
            pointer: Arc::new(StaticPointer::new()),
            opener: Arc::new(SystemLinkOpener),
        }
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything the overlay needs, constructed once at startup.
pub struct OverlayContext {
    store: ToastStore,
    engine: LayoutEngine,
    shaper: Box<dyn TextShaper>,
    compositor: Mutex<RenderCompositor>,
    controller: InteractionController,
    scheduler: Mutex<Scheduler>,
    surface: Arc<dyn HostSurface>,
    focus: Arc<dyn FocusProbe>,
    pointer: Arc<dyn PointerProbe>,
    opener: Arc<dyn LinkOpener>,
    ready: AtomicBool,
    epoch: Instant,
}

impl OverlayContext {
    pub fn new(options: OverlayOptions, backends: OverlayBackends) -> Result<Self> {
        let anchor = options.resolved_anchor();
        let compositor = RenderCompositor::new(
            options.viewport.0,
            options.viewport.1,
            anchor,
            options.gap,
        )?;
        Ok(Self {
            store: ToastStore::new(),
            engine: LayoutEngine::new(options.metrics),
            shaper: backends.shaper,
            compositor: Mutex::new(compositor),
            controller: InteractionController::new(anchor, options.gap),
            scheduler: Mutex::new(Scheduler::new(options.tick_interval, options.topmost_for)),
            surface: backends.surface,
            focus: backends.focus,
            pointer: backends.pointer,
            opener: backends.opener,
            ready: AtomicBool::new(false),
            epoch: Instant::now(),
        })
    }

    /// Marks the rendering backend ready and schedules the first frame.
    /// Until this is called every insertion is declined.
    pub fn initialize(&self) {
        self.ready.store(true, Ordering::SeqCst);
        self.store.mark_dirty();
        info!("overlay initialized");
    }

    pub fn shutdown(&self) {
        self.ready.store(false, Ordering::SeqCst);
        info!("overlay shut down");
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn store(&self) -> &ToastStore {
        &self.store
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        locked(&self.scheduler).tick_interval()
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Validates, lays out and inserts one toast request.
    ///
    /// All-or-nothing: on any failure the store is untouched and no id is
    /// consumed. Layout runs entirely outside the store lock; only the
    /// final list insertion is locked, and the new toast is fully visible
    /// to other lock holders before the id is returned.
    pub fn insert(&self, request: ToastRequest) -> Result<ToastId> {
        if !self.is_ready() {
            return Err(Error::Backend("rendering backend is not initialized".into()));
        }
        if request.title.is_empty() && request.body.is_empty() {
            return Err(Error::InvalidInput("toast needs a title or a body".into()));
        }

        // Pre-fit the image; a failed downscale degrades to text-only.
        let drawable = self.engine.metrics().drawable_width() as u32;
        let image = request
            .image
            .and_then(|image| transform::fit_to_width(image, drawable));

        let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let laid = self.engine.layout(
            self.shaper.as_ref(),
            &request.title,
            &request.body,
            image.as_ref(),
            &stamp,
        )?;

        let now = self.now();
        let id = self.store.insert(laid, now, request.link);
        locked(&self.scheduler).arm_topmost(now);
        if let Err(e) = self.surface.set_topmost(true) {
            warn!(error = %e, "failed to raise overlay");
        }
        info!(%id, "toast added");
        Ok(id)
    }

    /// The insertion API consumed by the ingestion boundary: the assigned
    /// id (>= 1) on success, `-1` when the request is declined.
    pub fn add_toast(
        &self,
        title: String,
        body: String,
        image: Option<crate::image_handler::RasterImage>,
        link: Option<String>,
    ) -> i64 {
        match self.insert(ToastRequest {
            title,
            body,
            image,
            link,
        }) {
            Ok(id) => id.value(),
            Err(e) => {
                warn!(error = %e, "toast declined");
                -1
            }
        }
    }

    /// One scheduler tick: hover evaluation, stay-on-top bookkeeping and a
    /// repaint if anything is dirty. Returns whether a frame was presented.
    pub fn tick(&self) -> Result<bool> {
        let actions = locked(&self.scheduler).tick(self.now());
        if actions.revoke_topmost {
            if let Err(e) = self.surface.set_topmost(false) {
                warn!(error = %e, "failed to lower overlay");
            }
        }

        let pointer = self.pointer.position();
        let mut compositor = locked(&self.compositor);
        compositor.poll_hover(&self.store, pointer);
        if actions.evaluate_repaint {
            if let Some(frame) = compositor.compose(&self.store, pointer) {
                self.surface.present(frame)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Entry point for translated pointer events re-posted from the input
    /// observation channel.
    pub fn on_pointer(&self, event: PointerEvent) {
        self.controller
            .on_pointer(&self.store, event, self.focus.as_ref(), &self.opener);
    }
}
