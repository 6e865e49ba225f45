//! HTTP request routing.
//!
//! Requests are matched on their exact path. Requests that don't match any route
//! get the default `404 - Not Found` page.
use std::collections::HashMap;

use async_trait::async_trait;

use super::{Error, Handler, Request, Response, ResponseWriter};

/// Maps request paths to handlers.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Duplicate paths are overwritten.
    pub fn route(mut self, path: &str, handler: impl Handler + 'static) -> Self {
        self.handlers.insert(path.to_string(), Box::new(handler));
        self
    }

    pub fn find(&self, path: &str) -> Option<&dyn Handler> {
        self.handlers.get(path).map(|handler| handler.as_ref())
    }

    fn not_found(response: &mut dyn ResponseWriter) {
        let not_found = Response::not_found();
        for (name, value) in ResponseWriter::headers(&not_found).iter() {
            response.set_header(name, value);
        }
        response.write_head(404);
        response.write(not_found.body());
    }
}

#[async_trait]
impl Handler for Router {
    async fn handle(
        &self,
        request: &Request,
        response: &mut dyn ResponseWriter,
    ) -> Result<(), Error> {
        match self.find(request.path()) {
            Some(handler) => handler.handle(request, response).await,
            None => {
                Self::not_found(response);
                Ok(())
            }
        }
    }
}
