//! Obscurer hides the URLs of your resources behind opaque paths.
//!
//! Every URL your handlers put in a `Location`, `Content-Location` or `Link`
//! response header is replaced with an obscured one, and the mapping is remembered.
//! When a client later requests the obscured URL, the request is transparently
//! passed to your handler with the original URL. Handlers never know obscuring
//! happened.
//!
//! # Getting started
//!
//! Obscurer is a library built on top of Tokio:
//!
//! ```bash
//! cargo add obscurer
//! cargo add tokio@1 --features full
//! ```
//!
//! Everything needed is in the prelude:
//!
//! ```
//! use obscurer::prelude::*;
//! ```
//!
//! ### Handlers
//!
//! Requests are answered by implementing the [`http::Handler`] trait:
//!
//! ```rust
//! use obscurer::prelude::*;
//!
//! struct Orders;
//!
//! #[obscurer::async_trait]
//! impl Handler for Orders {
//!     async fn handle(&self, _request: &Request, response: &mut dyn ResponseWriter) -> Result<(), Error> {
//!         response.set_header("location", "/orders/1");
//!         response.write_head(201);
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ### Obscuring
//!
//! Wrap your handlers in [`obscure::Obscure`] and give it to the server:
//!
//! ```rust
//! use std::sync::Arc;
//! use obscurer::prelude::*;
//!
//! # struct Orders;
//! # #[obscurer::async_trait]
//! # impl Handler for Orders {
//! #     async fn handle(&self, _request: &Request, _response: &mut dyn ResponseWriter) -> Result<(), Error> {
//! #         Ok(())
//! #     }
//! # }
//! let router = Router::new().route("/orders", Orders);
//! let store = Arc::new(MemoryStore::new());
//!
//! let server = Server::new(Obscure::new(Arc::new(Sha1Obscurer), store, router));
//! ```
//!
//! Then launch it, typically from the main function:
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     Logger::init();
//!     server.launch(Config::get().addr()).await
//! }
//! ```
pub mod colors;
pub mod config;
pub mod http;
pub mod logging;
pub mod obscure;
pub mod prelude;

/// Wrapper around async traits to make them easy to use.
pub use async_trait::async_trait;
/// Tokio is an asynchronous runtime for Rust.
pub use tokio;

/// Remove unsafe characters from a string printed
/// inside an HTML page.
pub fn safe_html(string: &str) -> String {
    string.replace('<', "&lt;").replace('>', "&gt;")
}
