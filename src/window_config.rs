//! Window configuration.
//!
//! Describes a window of the in-process reference transport. Environment
//! specific transports are free to ignore fields that do not apply to them.

use crate::Origin;

/// Configuration for creating a window.
///
/// # Example
///
/// ```
/// use window_messaging::WindowConfig;
///
/// let config = WindowConfig::new("https://app.example").with_window_id("checkout-frame");
/// assert_eq!(config.origin, "https://app.example");
/// ```
#[derive(Debug, Clone)]
pub struct WindowConfig {
    // ---
    /// Origin of the window (`scheme://host[:port]`).
    ///
    /// Stamped on every message the window posts.
    pub origin: Origin,

    /// Identifier used in log output.
    ///
    /// If `None`, a random UUID is assigned when the window is created.
    pub window_id: Option<String>,
}

impl WindowConfig {
    /// Create a config for a window with the given origin.
    pub fn new(origin: impl Into<Origin>) -> Self {
        Self {
            origin: origin.into(),
            window_id: None,
        }
    }

    /// Set an explicit window id for logging.
    pub fn with_window_id(mut self, id: impl Into<String>) -> Self {
        self.window_id = Some(id.into());
        self
    }
}
