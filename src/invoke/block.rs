//! Synchronous bridge for awaiting asynchronous operations.

use std::future::Future;

use anyhow::{Context, Result};

/// Drive a future to completion on the calling thread.
///
/// The engine is synchronous end to end; this is its only suspension point,
/// and it is a blocking wait rather than a yield. The calling thread is
/// parked until the future resolves or fails, so no other case or class can
/// interleave during the wait. There is no timeout or cancellation here: a
/// hung operation hangs the run.
///
/// # Errors
/// Returns an error if the bridge runtime cannot be constructed.
pub fn await_blocking<F: Future>(future: F) -> Result<F::Output> {
    let bridge = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build the blocking await bridge")?;

    Ok(bridge.block_on(future))
}
