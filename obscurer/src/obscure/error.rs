//! Errors that end a request with `500 - Internal Server Error`.
//!
//! The messages are sent to the client as-is.
use thiserror::Error;

use super::rewrite::{HeaderError, RewriteTarget};
use super::store;
use crate::http;

#[derive(Error, Debug)]
pub enum Error {
    #[error("obscurer: unable to remove URL from store")]
    FailedRemoval(#[source] store::Error),

    #[error("obscurer: unable to obscure '{target}' header")]
    Header {
        target: RewriteTarget,
        #[source]
        cause: HeaderError,
    },

    #[error("{0}")]
    Handler(#[from] http::Error),
}

impl Error {
    pub fn code(&self) -> u16 {
        500
    }
}

impl From<(RewriteTarget, HeaderError)> for Error {
    fn from((target, cause): (RewriteTarget, HeaderError)) -> Self {
        Error::Header { target, cause }
    }
}
