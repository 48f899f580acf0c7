// SPDX-License-Identifier: MPL-2.0
//! Just enough HTTP/1.1 for the local ingestion endpoint.
//!
//! One request per connection, `Connection: close` semantics. Only the
//! pieces the toast API needs are parsed: the request line, the query
//! string and a `Content-Length` body.

use crate::error::{Error, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on an ingestion request body. Inline images dominate body
/// size; anything larger than this is not a toast.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }
}

/// Reads and parses one request from the stream.
pub async fn read_request<R: AsyncBufRead + Unpin>(stream: &mut R) -> Result<Request> {
    let mut line = String::new();
    stream.read_line(&mut line).await?;
    if line.is_empty() {
        return Err(Error::Io("connection closed before request line".into()));
    }

    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("malformed request line".into()))?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("malformed request line".into()))?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query(query)),
        None => (target.to_string(), Vec::new()),
    };

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        stream.read_line(&mut header).await?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidInput("bad content-length".into()))?;
            }
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Err(Error::InvalidInput("request body too large".into()));
    }

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body).await?;

    Ok(Request {
        method,
        path,
        query,
        body,
    })
}

/// Writes a JSON response and closes out the exchange.
pub async fn write_json<W: AsyncWrite + Unpin>(
    stream: &mut W,
    status: u16,
    payload: &serde_json::Value,
) -> Result<()> {
    let body = payload.to_string();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

/// Splits a query string into decoded key/value pairs.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (percent_decode(key), percent_decode(value)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

/// Decodes `%XX` escapes and `+` spaces. Invalid escapes pass through
/// literally.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3);
                match hex.and_then(|h| u8::from_str_radix(std::str::from_utf8(h).ok()?, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
