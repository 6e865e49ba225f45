//! HTTP request.

use std::marker::Unpin;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Error, Head, Method, Url};
use crate::config::get_config;

/// HTTP request.
///
/// The request is fully loaded into memory. It's cheap to clone
/// since the body is behind an [`std::sync::Arc`].
#[derive(Debug, Clone, Default)]
pub struct Request {
    head: Head,
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    body: Vec<u8>,
    peer: Option<SocketAddr>,
}

impl Request {
    /// Create a request without a body, e.g. in tests.
    pub fn new(method: Method, url: &str) -> Result<Self, Error> {
        Ok(Self::from_head(Head::new(method, Url::parse(url)?)))
    }

    /// Create a request from an already parsed head.
    pub fn from_head(head: Head) -> Self {
        Self {
            head,
            inner: Arc::new(Inner::default()),
        }
    }

    /// Read the request in its entirety from a stream.
    pub async fn read(peer: SocketAddr, mut stream: impl AsyncRead + Unpin) -> Result<Self, Error> {
        let head = Head::read(&mut stream).await?;
        let content_length = head.content_length().unwrap_or(0);
        if content_length > get_config().general.body_max_size {
            return Err(Error::MalformedRequest("body too large"));
        }

        let mut body = Vec::new();
        (&mut stream)
            .take(content_length as u64)
            .read_to_end(&mut body)
            .await?;
        if body.len() != content_length {
            return Err(Error::MalformedRequest("incorrect content length"));
        }

        Ok(Request {
            head,
            inner: Arc::new(Inner {
                body,
                peer: Some(peer),
            }),
        })
    }

    /// Get the request's source IP address, if the request came from the network.
    pub fn peer(&self) -> Option<&SocketAddr> {
        self.inner.peer.as_ref()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Copy of this request pointing to a different URL. The body is shared.
    pub fn with_url(&self, url: Url) -> Self {
        let mut request = self.clone();
        request.head.replace_url(url);
        request
    }

    /// Request's body as bytes.
    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    /// Request's body as a UTF-8 string.
    /// UTF-8 encoding is assumed, and all incompatible characters are dropped.
    pub fn string(&self) -> String {
        String::from_utf8_lossy(self.body()).to_string()
    }
}

impl Deref for Request {
    type Target = Head;

    fn deref(&self) -> &Self::Target {
        &self.head
    }
}
