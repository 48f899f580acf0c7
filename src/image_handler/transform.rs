// SPDX-License-Identifier: MPL-2.0
//! Image transformation functions for the toast pipeline.

use crate::image_handler::RasterImage;
use image_rs::{imageops::FilterType, DynamicImage};

/// Fits an image into the drawable width of a toast card.
///
/// Images already narrow enough pass through untouched. Wider images are
/// downscaled preserving aspect ratio so the result is exactly `max_width`
/// pixels wide, with the height rounded from the same ratio. Returns `None`
/// if the scaled buffer cannot be produced; the caller then proceeds
/// text-only.
#[must_use]
pub fn fit_to_width(image: RasterImage, max_width: u32) -> Option<RasterImage> {
    if max_width == 0 {
        return None;
    }
    if image.width <= max_width {
        return Some(image);
    }

    let height = ((image.height as f64 * max_width as f64) / image.width as f64).round() as u32;
    resize(&image, max_width, height.max(1))
}

/// Resize the image to the provided dimensions using a high-quality filter.
#[must_use]
pub fn resize(image: &RasterImage, width: u32, height: u32) -> Option<RasterImage> {
    let width = width.max(1);
    let height = height.max(1);

    let buffer =
        image_rs::ImageBuffer::from_raw(image.width, image.height, image.pixels.clone())?;
    let resized = DynamicImage::ImageRgba8(buffer).resize_exact(width, height, FilterType::Lanczos3);
    RasterImage::from_rgba(width, height, resized.into_rgba8().into_raw())
}

/// Crop the image to the specified rectangle.
///
/// The rectangle coordinates are clamped to the image boundaries.
/// If the resulting crop area is invalid, returns `None`.
#[must_use]
pub fn crop(image: &RasterImage, x: u32, y: u32, width: u32, height: u32) -> Option<RasterImage> {
    let img_width = image.width;
    let img_height = image.height;

    // Clamp coordinates to image boundaries
    let x = x.min(img_width.saturating_sub(1));
    let y = y.min(img_height.saturating_sub(1));

    let max_width = img_width.saturating_sub(x);
    let max_height = img_height.saturating_sub(y);

    let width = width.min(max_width).max(1);
    let height = height.min(max_height).max(1);

    let buffer =
        image_rs::ImageBuffer::from_raw(image.width, image.height, image.pixels.clone())?;
    let cropped = DynamicImage::ImageRgba8(buffer).crop_imm(x, y, width, height);
    RasterImage::from_rgba(width, height, cropped.into_rgba8().into_raw())
}
