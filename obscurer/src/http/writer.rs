//! Where handlers write their response.
use super::Headers;

/// HTTP response sink.
///
/// Handlers set headers, the status code and the body in any order, or not at all.
/// Headers can be changed until the sink is serialized to the client; what happens
/// after that is up to the implementation.
pub trait ResponseWriter: Send {
    /// Response headers.
    fn headers(&self) -> &Headers;

    /// Mutable response headers.
    fn headers_mut(&mut self) -> &mut Headers;

    /// Set the status code.
    fn write_head(&mut self, code: u16);

    /// Write (part of) the response body.
    fn write(&mut self, body: &[u8]);

    /// Set a header. Shorthand for `headers_mut().insert(name, value)`.
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers_mut().insert(name, value);
    }
}
