//! HTTP response.
//!
//! A [`Response`] is built up in memory, either with the builder methods or by a
//! handler writing into it through [`ResponseWriter`], and then sent to the client
//! in one go.

use std::collections::HashMap;
use std::marker::Unpin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::{head::Version, Headers, ResponseWriter};

/// Response status, e.g. 404, 200, etc.
#[derive(Debug, PartialEq)]
pub enum Status {
    NotFound,
    InternalServerError,
    Ok,
    Created,
    Code(u16),
}

impl Status {
    pub fn code(&self) -> u16 {
        use Status::*;

        match self {
            NotFound => 404,
            InternalServerError => 500,
            Ok => 200,
            Created => 201,
            Code(code) => *code,
        }
    }

    /// Reason phrase sent on the status line.
    pub fn reason(&self) -> &'static str {
        match self.code() {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            _ => "",
        }
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Status {
        use Status::*;

        match code {
            404 => NotFound,
            500 => InternalServerError,
            200 => Ok,
            201 => Created,
            code => Code(code),
        }
    }
}

/// HTTP response.
#[derive(Debug)]
pub struct Response {
    code: u16,
    headers: Headers,
    version: Version,
    body: Vec<u8>,
    head_written: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Create empty response.
    pub fn new() -> Self {
        Self {
            code: 200,
            headers: Headers::from(HashMap::from([
                ("content-type".to_string(), "text/plain".to_string()),
                ("server".to_string(), "obscurer".to_string()),
            ])),
            body: vec![],
            version: Version::Http1,
            head_written: false,
        }
    }

    /// Response status, e.g. 200 OK.
    pub fn status(&self) -> Status {
        self.code.into()
    }

    /// Set response code.
    ///
    /// # Example
    ///
    /// ```
    /// use obscurer::http::Response;
    ///
    /// let response = Response::new().text("OK").code(200);
    /// ```
    pub fn code(mut self, code: u16) -> Self {
        self.code = code;
        self.head_written = true;
        self
    }

    /// Create a response with a plain text body.
    pub fn text(mut self, body: impl ToString) -> Self {
        self.body = body.to_string().into_bytes();
        self.header("content-type", "text/plain")
    }

    /// Create a response with an HTML body.
    pub fn html(mut self, body: impl ToString) -> Self {
        self.body = body.to_string().into_bytes();
        self.header("content-type", "text/html")
    }

    /// Add a header to the response.
    ///
    /// Header name is lowercased automatically. The value is set as-is.
    pub fn header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body as a UTF-8 string, dropping invalid characters.
    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header value by name. Case insensitive.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    /// Send the response to a stream, serialized as bytes.
    pub async fn send(mut self, mut stream: impl AsyncWrite + Unpin) -> Result<(), std::io::Error> {
        self.headers
            .insert("content-length", self.body.len().to_string());

        let status = self.status();
        let mut response = format!("{} {} {}\r\n", self.version, self.code, status.reason())
            .as_bytes()
            .to_vec();

        response.extend_from_slice(&self.headers.to_bytes());
        response.extend_from_slice(b"\r\n");
        response.extend_from_slice(&self.body);

        stream.write_all(&response).await
    }

    /// Default not found (404) error.
    pub fn not_found() -> Self {
        Self::new()
            .html(
                "
            <h3>
                <center>404 - Not Found</center>
            </h3>
        "
                .trim(),
            )
            .code(404)
    }

    pub fn bad_request() -> Self {
        Self::new()
            .html(
                "
            <h3>
                <center>400 - Bad Request</center>
            </h3>
        "
                .trim(),
            )
            .code(400)
    }

    pub fn internal_error(err: impl std::error::Error) -> Self {
        Self::new()
            .html(format!(
                "
            <h3>
                <center>500 - Internal Server Error</center>
            </h3>
            <br><br>
            <center><code style=\"padding: 25px;\">{}</code></center>
            ",
                crate::safe_html(&err.to_string())
            ))
            .code(500)
    }
}

impl ResponseWriter for Response {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn write_head(&mut self, code: u16) {
        if self.head_written {
            warn!(
                "superfluous write_head({}), status is already {}",
                code, self.code
            );
        } else {
            self.code = code;
            self.head_written = true;
        }
    }

    fn write(&mut self, body: &[u8]) {
        // Writing the body without a status implies 200.
        self.head_written = true;
        self.body.extend_from_slice(body);
    }
}
