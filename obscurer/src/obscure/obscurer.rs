//! Turn URLs into opaque ones.
//!
//! Obscuring is one-way: nothing here can turn an obscured URL back into the
//! original. That's what the [`Store`](super::Store) is for.
use sha1::{Digest, Sha1};

use crate::http::Url;

/// Obscures URLs.
///
/// Implementations must be deterministic: the same path always produces the same
/// obscured path, and only the path may change.
pub trait Obscurer: Send + Sync {
    fn obscure(&self, url: &Url) -> Url;
}

/// Replaces the URL path with the SHA-1 digest of the path, hex encoded.
///
/// Leading slashes are ignored, so `/hey/der` and `hey/der` obscure to the same path.
///
/// # Example
///
/// ```
/// use obscurer::prelude::*;
///
/// let url = Url::parse("https://example.com/hey/der?x=1").unwrap();
/// let obscured = Sha1Obscurer.obscure(&url);
///
/// assert_eq!(obscured.authority(), Some("example.com"));
/// assert_eq!(obscured.query(), Some("x=1"));
/// assert_eq!(obscured.path().len(), 41); // "/" + 40 hex characters
/// assert_eq!(obscured, Sha1Obscurer.obscure(&url));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha1Obscurer;

impl Obscurer for Sha1Obscurer {
    fn obscure(&self, url: &Url) -> Url {
        let path = url.path().trim_start_matches('/');
        url.with_path(format!("/{:x}", Sha1::digest(path.as_bytes())))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_obscure() {
        let url = Url::parse("http://www.example.com/this/is/the/way/?a=b#top").unwrap();
        let obscured = Sha1Obscurer.obscure(&url);

        // sha1("this/is/the/way/")
        let digest = Sha1::digest(b"this/is/the/way/");
        let hex = digest
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();

        assert_eq!(obscured.path(), format!("/{}", hex));
        assert_eq!(obscured.scheme(), Some("http"));
        assert_eq!(obscured.authority(), Some("www.example.com"));
        assert_eq!(obscured.query(), Some("a=b"));
        assert_eq!(obscured.fragment(), Some("top"));
    }

    #[test]
    fn test_known_digest() {
        // sha1("") is well known.
        let obscured = Sha1Obscurer.obscure(&Url::parse("/").unwrap());
        assert_eq!(obscured.path(), "/da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_deterministic() {
        let a = Sha1Obscurer.obscure(&Url::parse("/hey/der").unwrap());
        let b = Sha1Obscurer.obscure(&Url::parse("https://example.com//hey/der").unwrap());
        let c = Sha1Obscurer.obscure(&Url::parse("/hey/dear").unwrap());

        assert_eq!(a.path(), b.path());
        assert_ne!(a.path(), c.path());
        assert_eq!(a.path().len(), 41);
        assert!(a.path()[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
