//! Obscure URLs handed out to clients and serve requests for them.
//!
//! The pieces:
//!
//! - [`Obscurer`] turns a URL into an opaque one,
//! - [`Store`] remembers which original URL each obscured one stands for,
//! - [`HeaderRewriter`] obscures the URLs in response headers,
//! - [`ResponseInterceptor`] holds a response back until it has been inspected,
//! - [`Obscure`] is the handler that ties it all together.
pub mod error;
pub mod handler;
pub mod interceptor;
pub mod obscurer;
pub mod rewrite;
pub mod store;

pub use error::Error;
pub use handler::Obscure;
pub use interceptor::ResponseInterceptor;
pub use obscurer::{Obscurer, Sha1Obscurer};
pub use rewrite::{HeaderError, HeaderRewriter, RewriteTarget};
pub use store::{Mapping, MemoryStore, Store};
