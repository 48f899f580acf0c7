// SPDX-License-Identifier: MPL-2.0
//! The network-facing ingestion boundary.
//!
//! A local-only HTTP endpoint accepting toast submissions, with a start/
//! stop lifecycle independent of the rendering core. Each connection is
//! served by its own task; every submission goes through the context's
//! insertion API and is acknowledged with the assigned id.

pub mod api;
pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::overlay::OverlayContext;

pub struct IngestServer {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl IngestServer {
    /// Binds `addr` and starts accepting submissions.
    pub async fn start(ctx: Arc<OverlayContext>, addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Io(format!("unable to bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "ingestion endpoint listening");

        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(accept_loop(ctx, listener, rx));
        Ok(Self {
            local_addr,
            shutdown,
            handle,
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and waits for the accept loop to exit. In-flight
    /// connections finish on their own tasks.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
        info!("ingestion endpoint stopped");
    }
}

async fn accept_loop(
    ctx: Arc<OverlayContext>,
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let ctx = Arc::clone(&ctx);
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(ctx, stream).await {
                            debug!(%peer, error = %e, "connection error");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "accept failed"),
            },
        }
    }
}

async fn serve_connection(ctx: Arc<OverlayContext>, stream: TcpStream) -> Result<()> {
    let mut stream = BufReader::new(stream);
    let request = http::read_request(&mut stream).await?;
    debug!(method = %request.method, path = %request.path, "ingestion request");
    let (status, payload) = api::dispatch(&ctx, &request).await;
    http::write_json(stream.get_mut(), status, &payload).await
}
