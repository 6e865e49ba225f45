//! URL references, e.g. `/api/orders/1?sorted=true#header1` or
//! `https://example.com:8443/api/orders`.
//!
//! Components are stored exactly as they appear in the input, so a parsed
//! URL serializes back to the same string. Only the path is ever replaced,
//! by producing a new value with [`Url::with_path`].
//!
//! # Example
//!
//! ```
//! use obscurer::http::Url;
//!
//! let url = Url::parse("https://example.com/this/is/the/way?q=1").unwrap();
//! assert_eq!(url.path(), "/this/is/the/way");
//!
//! let moved = url.with_path("/elsewhere");
//! assert_eq!(moved.to_string(), "https://example.com/elsewhere?q=1");
//! ```
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Error;

// RFC 3986, appendix B.
static URI_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("valid uri regex")
});

/// URL reference, absolute or relative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Url {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Url {
    /// Parse a URL reference.
    ///
    /// Control characters, whitespace, backslashes, broken percent escapes,
    /// invalid schemes and non-numeric ports are rejected.
    pub fn parse(url: &str) -> Result<Url, Error> {
        if let Some(c) = url
            .chars()
            .find(|c| c.is_control() || c.is_whitespace() || *c == '\\')
        {
            return Err(Error::malformed_url(
                url,
                match c {
                    '\\' => "backslash in url",
                    c if c.is_control() => "control character in url",
                    _ => "whitespace in url",
                },
            ));
        }

        Self::check_escapes(url)?;

        let captures = URI_REFERENCE
            .captures(url)
            .ok_or(Error::malformed_url(url, "not a url"))?;
        let part = |i: usize| captures.get(i).map(|m| m.as_str().to_string());

        let scheme = part(1);
        if let Some(ref scheme) = scheme {
            let mut chars = scheme.chars();
            let first = chars.next().map(|c| c.is_ascii_alphabetic()) == Some(true);
            if !first || !chars.all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
                return Err(Error::malformed_url(
                    url,
                    "first path segment in url cannot contain colon",
                ));
            }
        }

        let authority = part(2);
        if let Some(ref authority) = authority {
            Self::check_port(url, authority)?;
        }

        Ok(Url {
            scheme,
            authority,
            path: part(3).unwrap_or_default(),
            query: part(4),
            fragment: part(5),
        })
    }

    fn check_escapes(url: &str) -> Result<(), Error> {
        let bytes = url.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'%' {
                let valid = bytes.len() > i + 2
                    && bytes[i + 1].is_ascii_hexdigit()
                    && bytes[i + 2].is_ascii_hexdigit();
                if !valid {
                    return Err(Error::malformed_url(url, "invalid percent escape"));
                }
                i += 3;
            } else {
                i += 1;
            }
        }

        Ok(())
    }

    fn check_port(url: &str, authority: &str) -> Result<(), Error> {
        // Drop user info.
        let host = authority.rsplit('@').next().unwrap_or(authority);

        let port = if host.starts_with('[') {
            // IPv6 literal, e.g. [::1]:8080
            match host.find(']') {
                Some(end) => host[end + 1..].strip_prefix(':'),
                None => return Err(Error::malformed_url(url, "missing ']' in host")),
            }
        } else {
            host.rsplit_once(':').map(|(_, port)| port)
        };

        match port {
            Some(port) if !port.chars().all(|c| c.is_ascii_digit()) => {
                Err(Error::malformed_url(url, "invalid port"))
            }
            _ => Ok(()),
        }
    }

    /// URL scheme, e.g. `https`.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// URL authority, e.g. `user@example.com:8000`.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// URL path, e.g. `/this/is/the/way`. Can be empty.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Raw fragment without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Has a scheme.
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Copy of this URL with a different path. All other components are kept as-is.
    pub fn with_path(&self, path: impl ToString) -> Url {
        Url {
            path: path.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref scheme) = self.scheme {
            write!(f, "{}:", scheme)?;
        }

        if let Some(ref authority) = self.authority {
            write!(f, "//{}", authority)?;
        }

        write!(f, "{}", self.path)?;

        if let Some(ref query) = self.query {
            write!(f, "?{}", query)?;
        }

        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }

        Ok(())
    }
}

impl FromStr for Url {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s)
    }
}

impl TryFrom<String> for Url {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Url::parse(&value)
    }
}

impl TryFrom<&str> for Url {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> String {
        url.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let url = Url::parse("http://user@www.example.com:8080/this/is/the/way/?a=b&c#top").unwrap();
        assert_eq!(url.scheme(), Some("http"));
        assert_eq!(url.authority(), Some("user@www.example.com:8080"));
        assert_eq!(url.path(), "/this/is/the/way/");
        assert_eq!(url.query(), Some("a=b&c"));
        assert_eq!(url.fragment(), Some("top"));
        assert!(url.is_absolute());
    }

    #[test]
    fn test_parse_relative() {
        let url = Url::parse("/hey/der").unwrap();
        assert_eq!(url.scheme(), None);
        assert_eq!(url.authority(), None);
        assert_eq!(url.path(), "/hey/der");
        assert_eq!(url.query(), None);
        assert!(!url.is_absolute());

        let url = Url::parse("example.com/foo").unwrap();
        assert_eq!(url.path(), "example.com/foo");
    }

    #[test]
    fn test_round_trip() {
        for url in [
            "",
            "/",
            "/hey/der",
            "/search?",
            "/search?q=rust%20lang",
            "https://[::1]:8443/a#",
            "mailto:someone@example.com",
            "//cdn.example.com/app.js",
        ] {
            assert_eq!(Url::parse(url).unwrap().to_string(), url);
        }
    }

    #[test]
    fn test_invalid() {
        for url in [
            "example.com\u{c}oo",
            "example.com\\foo",
            "/hey der",
            "/100%",
            "/%zz",
            "1http://example.com",
            "http://example.com:80a/",
            "http://[::1/",
        ] {
            let err = Url::parse(url).expect_err(url);
            assert_eq!(err.code(), 400);
        }
    }

    #[test]
    fn test_backslash_rejected() {
        // A literal backslash and a form feed are both refused, for different reasons.
        let err = Url::parse("example.com\\foo").unwrap_err();
        assert!(err.to_string().ends_with("backslash in url"));

        let err = Url::parse("example.com\u{c}oo").unwrap_err();
        assert!(err.to_string().ends_with("control character in url"));

        // Percent-encoded, it's fine.
        let url = Url::parse("/example.com%5Cfoo").unwrap();
        assert_eq!(url.path(), "/example.com%5Cfoo");
    }

    #[test]
    fn test_with_path() {
        let url = Url::parse("https://example.com:8000/a/b?x=1#frag").unwrap();
        let moved = url.with_path("/c");
        assert_eq!(moved.to_string(), "https://example.com:8000/c?x=1#frag");
        assert_eq!(url.path(), "/a/b");
    }
}
