//! Origins and target-origin constraints.
//!
//! An [`Origin`] identifies a browsing context by scheme, host and port. It is
//! the only security boundary used when filtering incoming messages, and it is
//! compared by strict string equality: no normalization, case folding or
//! default-port elision is applied.
//!
//! A [`TargetOrigin`] is the constraint a sender attaches to a posted message.
//! It is parsed from the same string form browsers accept for `postMessage`.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::{Error, Result};

/// Wildcard target origin. Disables the delivery restriction.
pub const ANY_ORIGIN: &str = "*";

/// Target origin meaning "same origin as the posting window".
pub const SAME_ORIGIN: &str = "/";

/// Origin of a browsing context (`scheme://host[:port]`).
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin(pub Arc<str>);

impl Origin {
    /// Borrow the origin as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `value` is a serialized origin.
    ///
    /// `value` must be exactly what a browser reports as an origin: lowercase
    /// host, no default port, no path. The opaque origin `null` is accepted.
    pub fn is_valid(value: &str) -> bool {
        // ---
        if value == "null" {
            return true;
        }

        match Url::parse(value) {
            Ok(url) => {
                let origin = url.origin();
                origin.is_tuple() && origin.ascii_serialization() == value
            }
            Err(_) => false,
        }
    }

    /// Parse as a URL origin for same-origin comparison.
    ///
    /// Returns `None` for strings that are not URLs, including `null`.
    fn to_url_origin(&self) -> Option<url::Origin> {
        Url::parse(&self.0).ok().map(|url| url.origin())
    }
}

impl<T> From<T> for Origin
where
    T: Into<Arc<str>>,
{
    fn from(value: T) -> Self {
        Origin(value.into())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Origin {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Origin {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Delivery constraint attached to a posted message.
///
/// Unlike the receiver's origin check, target origins follow URL semantics:
/// any URL is accepted and reduced to its origin, so a path is ignored and a
/// default port is elided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetOrigin {
    /// `*` - deliver regardless of the target's origin.
    Any,

    /// `/` - deliver only if the target shares the sender's origin.
    SameOrigin,

    /// Deliver only if the target is same-origin with this URL origin.
    ///
    /// An opaque origin (e.g. from a `data:` URL) matches no window.
    Exact(url::Origin),
}

impl TargetOrigin {
    /// Parse a target-origin string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrigin`] if `value` is neither `*`, `/` nor an
    /// absolute URL.
    pub fn parse(value: &str) -> Result<Self> {
        // ---
        match value {
            ANY_ORIGIN => Ok(TargetOrigin::Any),
            SAME_ORIGIN => Ok(TargetOrigin::SameOrigin),
            other => Url::parse(other)
                .map(|url| TargetOrigin::Exact(url.origin()))
                .map_err(|_| Error::InvalidOrigin(other.to_string())),
        }
    }

    /// Decide whether a message posted from `source` may be delivered to a
    /// window whose origin is `target`.
    ///
    /// Window origins that are not URLs (such as `null`) are never
    /// same-origin with anything.
    pub fn permits(&self, source: &Origin, target: &Origin) -> bool {
        // ---
        match self {
            TargetOrigin::Any => true,
            TargetOrigin::SameOrigin => match (source.to_url_origin(), target.to_url_origin()) {
                (Some(source), Some(target)) => source == target,
                _ => false,
            },
            TargetOrigin::Exact(origin) => target
                .to_url_origin()
                .is_some_and(|target| target == *origin),
        }
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOrigin::Any => f.write_str(ANY_ORIGIN),
            TargetOrigin::SameOrigin => f.write_str(SAME_ORIGIN),
            TargetOrigin::Exact(origin) => f.write_str(&origin.ascii_serialization()),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const APP: &str = "https://app.example";

    fn exact(value: &str) -> TargetOrigin {
        TargetOrigin::parse(value).unwrap()
    }

    #[test]
    fn test_valid_origins() {
        // ---
        assert!(Origin::is_valid("https://app.example"));
        assert!(Origin::is_valid("http://localhost:8080"));
        assert!(Origin::is_valid("https://[::1]"));
        assert!(Origin::is_valid("null"));
    }

    #[test]
    fn test_invalid_origins() {
        // ---
        assert!(!Origin::is_valid(""));
        assert!(!Origin::is_valid("app.example"));
        assert!(!Origin::is_valid("https://app.example/path"));
        assert!(!Origin::is_valid("https://app.example:443"));
        assert!(!Origin::is_valid("https://APP.example"));
        assert!(!Origin::is_valid("https://app.example:80a"));
        assert!(!Origin::is_valid("data:text/plain,hi"));
    }

    #[test]
    fn test_parse_target_origin() {
        // ---
        assert_eq!(exact("*"), TargetOrigin::Any);
        assert_eq!(exact("/"), TargetOrigin::SameOrigin);
        assert_eq!(exact(APP).to_string(), APP);
        assert!(matches!(
            TargetOrigin::parse("not an origin"),
            Err(Error::InvalidOrigin(s)) if s == "not an origin"
        ));
        assert!(matches!(
            TargetOrigin::parse("app.example"),
            Err(Error::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_target_origin_ignores_path() {
        // ---
        let target = exact("https://app.example/checkout?step=2#pay");
        assert_eq!(target, exact(APP));
        assert!(target.permits(&Origin::from("https://host.example"), &Origin::from(APP)));
    }

    #[test]
    fn test_target_origin_elides_default_port() {
        // ---
        let host = Origin::from("https://host.example");
        assert!(exact("https://app.example:443").permits(&host, &Origin::from(APP)));
        assert!(exact("HTTPS://APP.example").permits(&host, &Origin::from(APP)));
        assert!(!exact("https://app.example:8443").permits(&host, &Origin::from(APP)));
        assert!(!exact("http://app.example").permits(&host, &Origin::from(APP)));
    }

    #[test]
    fn test_opaque_target_matches_nothing() {
        // ---
        let target = exact("data:text/plain,hi");
        assert!(!target.permits(&Origin::from(APP), &Origin::from("null")));
        assert!(!target.permits(&Origin::from(APP), &Origin::from(APP)));
    }

    #[test]
    fn test_permits() {
        // ---
        let app = Origin::from(APP);
        let other = Origin::from("https://other.example");

        assert!(TargetOrigin::Any.permits(&app, &other));
        assert!(TargetOrigin::SameOrigin.permits(&app, &app));
        assert!(!TargetOrigin::SameOrigin.permits(&app, &other));
        assert!(!TargetOrigin::SameOrigin.permits(&Origin::from("null"), &Origin::from("null")));
        assert!(exact("https://other.example").permits(&app, &other));
        assert!(!exact(APP).permits(&app, &other));
    }

    #[test]
    fn test_strict_equality() {
        // ---
        // receiver-side origins are never normalized
        let origin = Origin::from(APP);
        assert_ne!(origin, Origin::from("https://APP.example"));
        assert_ne!(origin, Origin::from("https://app.example:443"));
        assert!(origin == APP);
    }
}
