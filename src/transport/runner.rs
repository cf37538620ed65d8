//! Window event loop.
//!
//! Drives delivery for a [`MemoryWindow`] in the background, the way a host
//! environment delivers posted messages on its own scheduling turn.
//!
//! The loop is intentionally small. It does **not**:
//! - retry or re-deliver events a listener failed on
//! - impose ordering beyond the window's own queue order
//! - keep the window alive past [`MemoryWindow::close`]
//!
//! ## Error handling
//!
//! A listener error is the event-dispatch context's to deal with. Here that
//! context is the loop itself: the error is logged at `warn` level and the
//! loop carries on with the next queued event. Callers that need to observe
//! listener errors directly should drive delivery with
//! [`MemoryWindow::dispatch_pending`] instead.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::transport::MemoryWindow;
use crate::{log_info, log_warn};

/// Start delivering queued events for `window` on a background task.
///
/// The task wakes whenever a message is posted to the window, dispatches every
/// queued event, then waits again. It yields while idle and does not spin.
///
/// The returned [`JoinHandle`] completes after [`MemoryWindow::close`] is
/// called. Dropping the handle does not stop the loop.
///
/// Must be called from within a tokio runtime.
pub fn spawn_event_loop(window: Arc<MemoryWindow>) -> JoinHandle<()> {
    // ---
    tokio::spawn(async move {
        log_info!("{}: event loop started", window.id());

        while !window.is_closed() {
            match window.dispatch_pending() {
                Ok(_) => window.notified().await,
                Err(_err) => {
                    log_warn!("{}: message listener error: {_err}", window.id());
                }
            }
        }

        log_info!("{}: event loop stopped", window.id());
    })
}
