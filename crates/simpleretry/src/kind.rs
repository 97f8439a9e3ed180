//! Error classification for abort matching.
//!
//! A retry policy names the error kinds that must never be retried. Matching
//! is hierarchical: listing a kind also covers every more specific kind below
//! it, so `Timeout` whose parent is `Network` is aborted by a policy that
//! lists `Network`.
//!
//! # Examples
//!
//! ```rust
//! use simpleretry::kind::ErrorKind;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Network,
//!     Timeout,
//!     Business,
//! }
//!
//! impl ErrorKind for Kind {
//!     fn parent(self) -> Option<Self> {
//!         match self {
//!             Kind::Timeout => Some(Kind::Network),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert!(Kind::Timeout.is_a(Kind::Network));
//! assert!(!Kind::Network.is_a(Kind::Timeout));
//! assert!(!Kind::Business.is_a(Kind::Network));
//! ```

use std::fmt::Debug;

/// A classification tag for errors, arranged in a single-parent hierarchy.
///
/// The parent chain of every kind must terminate; a cycle makes
/// [`ErrorKind::is_a`] loop forever.
pub trait ErrorKind: Debug + Copy + Eq + Send + Sync + 'static {
    /// The less specific kind this kind refines, if any.
    ///
    /// Default implementation returns `None` (a flat set of tags).
    fn parent(self) -> Option<Self> {
        None
    }

    /// Whether `self` is `ancestor` or refines it, directly or transitively.
    fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

/// An error that can report its [`ErrorKind`].
///
/// Executors only need the kind to decide whether an error aborts retrying;
/// the error value itself is always handed back to the caller untouched.
pub trait Classify {
    /// The kind hierarchy this error is classified into.
    type Kind: ErrorKind;

    /// The most specific kind of this error.
    fn kind(&self) -> Self::Kind;
}

impl ErrorKind for std::io::ErrorKind {}

impl Classify for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> Self::Kind {
        std::io::Error::kind(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Any,
        Network,
        Timeout,
        ConnectTimeout,
        Business,
    }

    impl ErrorKind for Kind {
        fn parent(self) -> Option<Self> {
            match self {
                Kind::Any => None,
                Kind::Network | Kind::Business => Some(Kind::Any),
                Kind::Timeout => Some(Kind::Network),
                Kind::ConnectTimeout => Some(Kind::Timeout),
            }
        }
    }

    #[test]
    fn test_exact_kind_matches() {
        assert!(Kind::Business.is_a(Kind::Business));
    }

    #[test]
    fn test_transitive_refinement_matches() {
        assert!(Kind::ConnectTimeout.is_a(Kind::Timeout));
        assert!(Kind::ConnectTimeout.is_a(Kind::Network));
        assert!(Kind::ConnectTimeout.is_a(Kind::Any));
    }

    #[test]
    fn test_sibling_and_ancestor_do_not_match() {
        assert!(!Kind::Business.is_a(Kind::Network));
        assert!(!Kind::Network.is_a(Kind::Timeout));
        assert!(!Kind::Any.is_a(Kind::Business));
    }

    #[test]
    fn test_io_error_is_classified_by_its_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert_eq!(Classify::kind(&err), std::io::ErrorKind::TimedOut);
        assert!(!std::io::ErrorKind::TimedOut.is_a(std::io::ErrorKind::NotFound));
    }
}
