//! Request handlers.
use std::sync::Arc;

use async_trait::async_trait;

use super::{Error, Request, ResponseWriter};

/// Something that answers HTTP requests.
///
/// A handler writes its response into the provided [`ResponseWriter`]. Handlers
/// compose: a handler can wrap another one and change the request it sees or the
/// response it produces, while still being usable anywhere a plain handler is.
///
/// # Example
///
/// ```
/// use obscurer::prelude::*;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(
///         &self,
///         _request: &Request,
///         response: &mut dyn ResponseWriter,
///     ) -> Result<(), Error> {
///         response.write_head(200);
///         response.write(b"hello");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle the request.
    async fn handle(&self, request: &Request, response: &mut dyn ResponseWriter)
        -> Result<(), Error>;

    /// Name of this handler, used in logs.
    fn handler_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn handle(
        &self,
        request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), Error> {
        (**self).handle(request, response).await
    }

    fn handler_name(&self) -> &'static str {
        (**self).handler_name()
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(
        &self,
        request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), Error> {
        (**self).handle(request, response).await
    }

    fn handler_name(&self) -> &'static str {
        (**self).handler_name()
    }
}
