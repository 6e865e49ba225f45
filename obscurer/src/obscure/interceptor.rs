//! Hold back a response until it has been inspected.
//!
//! The wrapped handler writes into a [`ResponseInterceptor`] instead of the real
//! sink. The status code and body are kept aside, so the obscuring handler can look
//! at them, and change the headers, before anything is passed on.
use crate::http::{Headers, ResponseWriter};

/// Captures the status and body written by a handler.
///
/// Headers are not captured: they live in the underlying sink and are shared, so
/// changes made before [`flush`](Self::flush) are sent with the response.
///
/// The captured response is passed on exactly once, either by an explicit
/// [`flush`](Self::flush) or when the interceptor is dropped.
pub struct ResponseInterceptor<'a> {
    writer: &'a mut dyn ResponseWriter,
    status: Option<u16>,
    body: Vec<u8>,
    flushed: bool,
}

impl<'a> ResponseInterceptor<'a> {
    pub fn new(writer: &'a mut dyn ResponseWriter) -> Self {
        Self {
            writer,
            status: None,
            body: vec![],
            flushed: false,
        }
    }

    /// Status code set by the handler, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Body written by the handler so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace whatever the handler wrote with an error.
    pub fn fail(&mut self, code: u16, message: &str) {
        self.writer.set_header("content-type", "text/plain");
        self.status = Some(code);
        self.body = message.as_bytes().to_vec();
    }

    /// Pass the status code and the body to the underlying sink.
    ///
    /// Only the first call does anything. If the handler never set a status code,
    /// none is written, leaving the default up to the sink.
    pub fn flush(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;

        if let Some(status) = self.status {
            self.writer.write_head(status);
        }

        if !self.body.is_empty() {
            let body = std::mem::take(&mut self.body);
            self.writer.write(&body);
        }
    }

    pub fn flushed(&self) -> bool {
        self.flushed
    }
}

impl ResponseWriter for ResponseInterceptor<'_> {
    fn headers(&self) -> &Headers {
        self.writer.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.writer.headers_mut()
    }

    fn write_head(&mut self, code: u16) {
        // First one wins, like on the wire.
        if self.status.is_none() {
            self.status = Some(code);
        }
    }

    fn write(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }
}

impl Drop for ResponseInterceptor<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
