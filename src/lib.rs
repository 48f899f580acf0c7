// SPDX-License-Identifier: MPL-2.0
//! `glowtoast` renders a stack of transient notification cards as an
//! always-present overlay on the desktop background.
//!
//! New toasts arrive over a local HTTP ingestion endpoint; the user
//! dismisses them with shift-click and activates their links with
//! ctrl-click. Each card is laid out once into a pair of pre-rendered
//! surfaces (normal and hover-highlighted), so interaction feedback is a
//! bitmap swap rather than a re-render. The window system, global input
//! observation and text shaping are boundaries ([`host`],
//! [`render::shaper`]) this crate consumes but does not implement.

#![doc(html_root_url = "https://docs.rs/glowtoast/0.1.0")]

pub mod config;
pub mod error;
pub mod host;
pub mod image_handler;
pub mod ingest;
pub mod logging;
pub mod overlay;
pub mod render;
