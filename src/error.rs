use thiserror::Error;

/// Boxed error returned by message handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while posting or dispatching window messages
#[derive(Error, Debug)]
pub enum Error {
    /// The target window has been closed
    #[error("window closed: {0}")]
    WindowClosed(String),

    /// The target origin is neither `*`, `/` nor a valid origin
    #[error("invalid target origin: {0}")]
    InvalidOrigin(String),

    /// Payload conversion to or from JSON failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error raised by a caller-supplied message handler
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),
}

impl Error {
    /// Wrap an arbitrary error raised inside a message handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Handler(err.into())
    }
}

/// Result type alias for window messaging operations
pub type Result<T> = std::result::Result<T, Error>;
