//! Request head, including HTTP method, URL, version and headers.

use std::marker::Unpin;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Error, Headers, Url};
use crate::config::get_config;

/// HTTP method, e.g. GET, POST, etc.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Method {
    /// `GET` request.
    #[default]
    Get,
    /// `POST` request.
    Post,
    /// `PUT` request.
    Put,
    /// `DELETE` request.
    Delete,
    /// `HEAD` request.
    Head,
    /// `PATCH` request.
    Patch,
    /// Some other request we don't have a name for.
    Other(String),
}

impl From<String> for Method {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "PATCH" => Method::Patch,
            _ => Method::Other(value),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Method::*;

        let name = match self {
            Get => "GET",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Head => "HEAD",
            Patch => "PATCH",
            Other(other) => other.as_str(),
        };

        write!(f, "{}", name)
    }
}

/// HTTP version.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Version {
    /// HTTP/1.0.
    Http10,
    /// HTTP/1.1.
    #[default]
    Http1,
    /// Some other HTTP version we don't speak.
    Unknown,
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        match value {
            "HTTP/1.1" => Version::Http1,
            "HTTP/1.0" => Version::Http10,
            _ => Version::Unknown,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Version::Http10 => write!(f, "HTTP/1.0"),
            Version::Http1 => write!(f, "HTTP/1.1"),
            Version::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Request HTTP method, URL, HTTP version and headers.
#[derive(Debug, Clone, Default)]
pub struct Head {
    method: Method,
    url: Url,
    version: Version,
    headers: Headers,
}

impl Head {
    /// Create a request head by hand, e.g. in tests.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            version: Version::Http1,
            headers: Headers::new(),
        }
    }

    /// Read request head from a stream.
    pub async fn read(mut stream: impl AsyncRead + Unpin) -> Result<Self, Error> {
        // Shared by all lines of the head.
        let mut bytes_remaining = get_config().general.header_max_size;

        let line = Self::read_line(&mut stream, &mut bytes_remaining).await?;
        let mut request = line.split(' ');

        let method = request.next().ok_or(Error::MalformedRequest("method"))?;
        let method = Method::from(method.to_string());

        let url = request.next().ok_or(Error::MalformedRequest("path"))?;
        let url = Url::parse(url)?;

        let version = request.next().ok_or(Error::MalformedRequest("version"))?;
        let version = Version::from(version);

        let mut headers = Headers::new();

        loop {
            let header = Self::read_line(&mut stream, &mut bytes_remaining).await?;
            if header.is_empty() {
                break;
            }

            let (name, value) = header
                .split_once(':')
                .ok_or(Error::MalformedRequest("header"))?;
            headers.insert(name.trim(), value.trim());
        }

        Ok(Head {
            method,
            url,
            version,
            headers,
        })
    }

    /// The request URL as it appeared in the request line, e.g. `/foo?hello=world`,
    /// unless it was replaced.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request path, e.g. `/foo`.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Request method, e.g. `GET`, `POST`, etc.
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get all request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Get a header value by name, if it exists.
    ///
    /// Case insensitive.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    /// The size of the request body in bytes. This is provided by the `Content-Length` header.
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get("content-length")
            .and_then(|cl| cl.parse::<usize>().ok())
    }

    /// Is the keep-alive flag set?
    pub fn keep_alive(&self) -> bool {
        self.headers
            .get("connection")
            // Requests can contain other attributes.
            // We just care about keep-alive.
            .map(|s| s.to_lowercase().contains("keep-alive"))
            .unwrap_or(false)
    }

    /// Change the URL of this request. Used to rewrite requests
    /// before they reach a handler.
    pub fn replace_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Read a line from the stream, parsing out \r\n.
    ///
    /// Fails if the line doesn't end within `bytes_remaining` bytes.
    async fn read_line(
        mut stream: impl AsyncRead + Unpin,
        bytes_remaining: &mut usize,
    ) -> Result<String, Error> {
        let mut buf = Vec::new();
        let (mut cr, mut lf) = (false, false);

        loop {
            if *bytes_remaining == 0 {
                return Err(Error::MalformedRequest("header too large"));
            }

            // `stream` should be buffered.
            let b = stream.read_u8().await?;
            *bytes_remaining -= 1;

            if b == b'\r' {
                cr = true;
                if lf {
                    return Err(Error::MalformedRequest("nl before cr"));
                }
            } else if b == b'\n' {
                lf = true;
            } else {
                buf.push(b);
            }

            if cr && lf {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}
