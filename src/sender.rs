//! Message sender.
//!
//! Wraps a payload in an [`Envelope`] and posts it to a target window,
//! restricted to a destination origin. Fire-and-forget: there is no delivery
//! confirmation and nothing waits for the message to be handled.

use serde::Serialize;

use crate::domain::MessageTarget;
use crate::{Envelope, Result};

/// Send a typed message to a target window.
///
/// Builds `{ "type": message_type, "payload": payload }` and posts it through
/// `target` with `allowed_origin` as the delivery constraint. Passing `"*"`
/// disables the origin restriction; that choice is left to the caller.
///
/// The message type is not validated.
///
/// # Errors
///
/// Returns [`Error::Serialization`](crate::Error::Serialization) if `payload`
/// cannot be represented as structured data. Any error from the target's
/// transport (closed window, malformed origin) is returned unchanged.
///
/// # Example
///
/// ```
/// # use window_messaging::{create_memory_window, send_message_to_window, WindowConfig};
/// # use serde_json::json;
/// # fn example() -> window_messaging::Result<()> {
/// let host = create_memory_window(WindowConfig::new("https://host.example"));
/// let frame = create_memory_window(WindowConfig::new("https://app.example"));
///
/// let frame_window = host.proxy_to(&frame);
/// send_message_to_window(&frame_window, "PING", json!({ "n": 1 }), "https://app.example")?;
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn send_message_to_window<T, P>(
    target: &T,
    message_type: &str,
    payload: P,
    allowed_origin: &str,
) -> Result<()>
where
    T: MessageTarget + ?Sized,
    P: Serialize,
{
    // ---
    let payload = serde_json::to_value(payload)?;
    send_envelope(target, Envelope::new(message_type, payload), allowed_origin)
}

/// Post a pre-built envelope to a target window.
///
/// # Errors
///
/// Transport errors are returned unchanged.
pub fn send_envelope<T>(target: &T, envelope: Envelope, allowed_origin: &str) -> Result<()>
where
    T: MessageTarget + ?Sized,
{
    target.post_message(envelope.into(), allowed_origin)
}
