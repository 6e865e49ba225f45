//! Obscure URLs in response headers.
//!
//! Only headers that point the client to a resource are rewritten:
//!
//! - [`Location`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Location)
//! - [`Content-Location`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Content-Location)
//! - [`Link`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Link)
//!
//! They are always processed in this order.
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::{store, Mapping, Obscurer, Store};
use crate::colors::MaybeColorize;
use crate::http::{self, Headers, Url};

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<([^>]+)>").expect("valid link regex"));

/// Why a header couldn't be obscured.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("no url found in header value")]
    Missing,

    #[error("{0}")]
    Url(#[from] http::Error),

    #[error("{0}")]
    Store(#[from] store::Error),
}

/// A response header containing a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteTarget {
    Location,
    ContentLocation,
    Link,
}

impl RewriteTarget {
    /// All targets, in the order they are rewritten.
    pub const ALL: [RewriteTarget; 3] = [
        RewriteTarget::Location,
        RewriteTarget::ContentLocation,
        RewriteTarget::Link,
    ];

    /// Header name.
    pub fn name(&self) -> &'static str {
        match self {
            RewriteTarget::Location => "Location",
            RewriteTarget::ContentLocation => "Content-Location",
            RewriteTarget::Link => "Link",
        }
    }

    /// Where the URL is in the header value.
    ///
    /// `Location` and `Content-Location` are URLs. `Link` looks like
    /// `<https://example.com/next>; rel="next"`; the URL is between the angle brackets.
    pub fn extract(&self, value: &str) -> Option<Range<usize>> {
        match self {
            RewriteTarget::Location | RewriteTarget::ContentLocation => Some(0..value.len()),
            RewriteTarget::Link => LINK
                .captures(value)
                .and_then(|captures| captures.get(1))
                .map(|url| url.range()),
        }
    }
}

impl fmt::Display for RewriteTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Obscures the URLs in rewrite target headers and remembers the mappings.
#[derive(Clone)]
pub struct HeaderRewriter {
    obscurer: Arc<dyn Obscurer>,
    store: Arc<dyn Store>,
}

impl HeaderRewriter {
    pub fn new(obscurer: Arc<dyn Obscurer>, store: Arc<dyn Store>) -> Self {
        Self { obscurer, store }
    }

    /// Rewrite all targets, stopping at the first failure.
    ///
    /// Headers rewritten before the failure stay rewritten.
    pub fn rewrite(&self, headers: &mut Headers) -> Result<(), (RewriteTarget, HeaderError)> {
        for target in RewriteTarget::ALL {
            self.rewrite_header(headers, target)
                .map_err(|err| (target, err))?;
        }

        Ok(())
    }

    /// Obscure the URL in one header. Returns the new mapping, or `None` if
    /// the header isn't set.
    pub fn rewrite_header(
        &self,
        headers: &mut Headers,
        target: RewriteTarget,
    ) -> Result<Option<Mapping>, HeaderError> {
        let value = match headers.get(target.name()) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => return Ok(None),
        };

        let range = target.extract(&value).ok_or(HeaderError::Missing)?;
        let original = Url::parse(&value[range.clone()])?;
        let obscured = self.obscurer.obscure(&original);

        let mut rewritten = value.clone();
        rewritten.replace_range(range, &obscured.to_string());

        debug!(
            "{} {}: {} => {}",
            "obscure".purple(),
            target.name(),
            value,
            rewritten.green()
        );

        headers.insert(target.name(), rewritten);
        self.store.put(&obscured, &original)?;

        Ok(Some(Mapping::new(obscured, original)))
    }
}
