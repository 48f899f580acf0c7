// SPDX-License-Identifier: MPL-2.0
//! Rasterization layer: the text-shaping seam and the painter that turns
//! shaped runs into card pixels.

pub mod painter;
pub mod shaper;
