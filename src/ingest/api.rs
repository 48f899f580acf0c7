// SPDX-License-Identifier: MPL-2.0
//! The toast submission API.
//!
//! `GET /toast` takes simple key/value parameters; `POST /toast` takes a
//! JSON body with an optional inline base64 image. Both answer with a
//! small status payload carrying the assigned id, or a structured error.
//! Failures never reach the overlay itself.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::image_handler::{self, RasterImage};
use crate::ingest::http::Request;
use crate::overlay::OverlayContext;

#[derive(Debug, Default, Deserialize)]
struct ToastBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
    /// Base64 of an encoded raster (PNG, JPEG, ...).
    #[serde(default)]
    image: String,
    #[serde(default)]
    link: Option<String>,
}

/// Routes one parsed request to its handler.
pub async fn dispatch(ctx: &OverlayContext, request: &Request) -> (u16, Value) {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/toast") => get_toast(ctx, request).await,
        ("POST", "/toast") => post_toast(ctx, request),
        _ => (404, error_payload("not found")),
    }
}

async fn get_toast(ctx: &OverlayContext, request: &Request) -> (u16, Value) {
    if !request.has_param("title") && !request.has_param("text") {
        return (200, error_payload("invalid parameters"));
    }

    let title = request.param("title").unwrap_or_default().to_string();
    let text = request.param("text").unwrap_or_default().to_string();
    let link = request.param("link").map(str::to_owned);

    let mut image = None;
    if let Some(url) = request.param("imageurl") {
        // A failed download or decode degrades to a text-only toast.
        image = fetch_image(url).await;
    }

    submit(ctx, title, text, image, link)
}

fn post_toast(ctx: &OverlayContext, request: &Request) -> (u16, Value) {
    let body: ToastBody = match serde_json::from_slice(&request.body) {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "rejecting unparsable toast body");
            return (200, error_payload("invalid request body"));
        }
    };

    let mut image = None;
    if !body.image.is_empty() {
        let bytes = match BASE64.decode(body.image.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => return (200, error_payload("unable to decode base64")),
        };
        image = match image_handler::decode(&bytes) {
            Ok(image) => Some(image),
            Err(_) => return (200, error_payload("unable to decode image")),
        };
    }

    submit(ctx, body.title, body.text, image, body.link)
}

fn submit(
    ctx: &OverlayContext,
    title: String,
    text: String,
    image: Option<RasterImage>,
    link: Option<String>,
) -> (u16, Value) {
    let id = ctx.add_toast(title, text, image, link);
    if id == -1 {
        return (200, error_payload("unable to add toast"));
    }
    (200, ok_payload(id))
}

async fn fetch_image(url: &str) -> Option<RasterImage> {
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(e) => {
            debug!(url, error = %e, "image download failed");
            return None;
        }
    };
    let bytes = response.bytes().await.ok()?;
    match image_handler::decode(&bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            debug!(url, error = %e, "downloaded image is undecodable");
            None
        }
    }
}

fn ok_payload(id: i64) -> Value {
    json!({ "status": "ok", "id": id.to_string() })
}

fn error_payload(msg: &str) -> Value {
    json!({ "status": "error", "msg": msg })
}
