// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::sync::Arc;

use glowtoast::error::Result;
use glowtoast::host::EventQueue;
use glowtoast::ingest::IngestServer;
use glowtoast::overlay::{OverlayBackends, OverlayContext, OverlayOptions};
use glowtoast::{config, logging};

fn main() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();

    let verbosity: u8 = if args.contains(["-d", "--debug"]) { 3 } else { 2 };
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config").unwrap();
    let listen_override: Option<String> = args.opt_value_from_str("--listen").unwrap();

    let config = match &config_path {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    logging::init(verbosity)?;

    let listen = listen_override.unwrap_or_else(|| config.listen_addr());
    let ctx = Arc::new(OverlayContext::new(
        OverlayOptions::from_config(&config),
        OverlayBackends::headless(),
    )?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(ctx, &listen))
}

async fn run(ctx: Arc<OverlayContext>, listen: &str) -> Result<()> {
    ctx.initialize();
    let server = IngestServer::start(ctx.clone(), listen).await?;

    // A window-system integration clones `events.sender()` into its input
    // observation thread; the primary loop only ever drains.
    let events = EventQueue::new();

    let mut ticker = tokio::time::interval(ctx.tick_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                events.drain(|event| ctx.on_pointer(event));
                ctx.tick()?;
            }
            _ = &mut ctrl_c => break,
        }
    }

    server.stop().await;
    ctx.shutdown();
    Ok(())
}
