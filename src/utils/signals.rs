//! Signal handling for graceful shutdown

use std::io;
use futures::stream::StreamExt;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for a signal that means the process is about to go away
/// (SIGTERM, SIGINT, SIGHUP) and return its number
pub async fn shutdown_signal() -> io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;
    let handle = signals.handle();

    let signal = signals.next().await;
    handle.close();

    match signal {
        Some(signal) => {
            info!("Received signal: {}", signal);
            Ok(signal)
        }
        None => Err(io::Error::new(io::ErrorKind::Other, "signal stream closed")),
    }
}
