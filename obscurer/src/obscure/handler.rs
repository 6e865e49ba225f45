//! The obscuring handler.
//!
//! [`Obscure`] wraps another handler. For every request it:
//!
//! 1. looks up the request URL in the store and, if it's an obscured URL, passes the
//!    original URL to the wrapped handler instead,
//! 2. runs the wrapped handler against a [`ResponseInterceptor`],
//! 3. removes the mapping for the requested URL if the wrapped handler answered 404,
//! 4. obscures the `Location`, `Content-Location` and `Link` response headers,
//!    remembering each new mapping in the store,
//! 5. sends the response.
//!
//! Any failure in steps 3 and 4 replaces the response with a `500` and a fixed
//! message, see [`Error`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use obscurer::prelude::*;
//!
//! # struct Index;
//! # #[async_trait]
//! # impl Handler for Index {
//! #     async fn handle(&self, _: &Request, response: &mut dyn ResponseWriter) -> Result<(), obscurer::http::Error> {
//! #         response.write(b"we made it!");
//! #         Ok(())
//! #     }
//! # }
//! let store = Arc::new(MemoryStore::new());
//! let router = Router::new().route("/this/is/the/way", Index);
//! let handler = Obscure::new(Arc::new(Sha1Obscurer), store.clone(), router);
//! let server = Server::new(handler);
//! ```
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::{Error, HeaderRewriter, Obscurer, ResponseInterceptor, Store};
use crate::colors::MaybeColorize;
use crate::http::{self, Handler, Request, ResponseWriter, Url};

/// Serves obscured URLs and obscures URLs in responses.
pub struct Obscure {
    handler: Box<dyn Handler>,
    store: Arc<dyn Store>,
    rewriter: Option<HeaderRewriter>,
    deobscure: bool,
}

impl Obscure {
    /// Deobscure requests and obscure response headers.
    pub fn new(
        obscurer: Arc<dyn Obscurer>,
        store: Arc<dyn Store>,
        handler: impl Handler + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            rewriter: Some(HeaderRewriter::new(obscurer, store.clone())),
            store,
            deobscure: true,
        }
    }

    /// Only obscure response headers. Request URLs are passed through as-is.
    pub fn headers(
        obscurer: Arc<dyn Obscurer>,
        store: Arc<dyn Store>,
        handler: impl Handler + 'static,
    ) -> Self {
        Self {
            deobscure: false,
            ..Self::new(obscurer, store, handler)
        }
    }

    /// Only deobscure requests, and forget URLs that lead to a 404.
    /// Response headers are passed through as-is.
    pub fn requests(store: Arc<dyn Store>, handler: impl Handler + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            store,
            rewriter: None,
            deobscure: true,
        }
    }

    /// The store used by this handler.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The request as the wrapped handler should see it.
    fn deobscure(&self, request: &Request) -> Option<Request> {
        if !self.deobscure {
            return None;
        }

        let original = self.store.get(request.url())?;

        debug!(
            "{} {} => {}",
            "deobscure".purple(),
            request.url().to_string().purple(),
            original.to_string().green()
        );

        Some(request.with_url(original))
    }

    /// Run the wrapped handler and post-process its response.
    ///
    /// `obscured` is the URL as the client requested it, before deobscuring.
    async fn intercept(
        &self,
        obscured: &Url,
        request: &Request,
        interceptor: &mut ResponseInterceptor<'_>,
    ) -> Result<(), Error> {
        self.handler.handle(request, &mut *interceptor).await?;

        // Forget resources that don't exist (anymore).
        if self.deobscure && interceptor.status() == Some(404) {
            debug!("{} {}", "forget".purple(), obscured.to_string().purple());
            self.store.remove(obscured).map_err(Error::FailedRemoval)?;
        }

        if let Some(ref rewriter) = self.rewriter {
            rewriter.rewrite(interceptor.headers_mut())?;
        }

        Ok(())
    }
}

#[async_trait]
impl Handler for Obscure {
    async fn handle(
        &self,
        request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), http::Error> {
        let deobscured = self.deobscure(request);
        let obscured = request.url();

        let mut interceptor = ResponseInterceptor::new(response);

        let result = self
            .intercept(
                obscured,
                deobscured.as_ref().unwrap_or(request),
                &mut interceptor,
            )
            .await;

        if let Err(err) = result {
            error!(
                "{} {}: {}",
                "obscurer".red(),
                request.path().purple(),
                match std::error::Error::source(&err) {
                    Some(source) => format!("{} ({})", err, source),
                    None => err.to_string(),
                }
            );
            interceptor.fail(err.code(), &err.to_string());
        }

        interceptor.flush();

        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        self.handler.handler_name()
    }
}
