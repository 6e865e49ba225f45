//! Types and traits needed to put the obscurer in front of your handlers.
//!
//! ```
//! use obscurer::prelude::*;
//! ```
pub use crate::config::Config;
pub use crate::http::{
    Error, Handler, Headers, Method, Request, Response, ResponseWriter, Router, Server, Status,
    Url,
};
pub use crate::logging::Logger;
pub use crate::obscure::{Mapping, MemoryStore, Obscure, Obscurer, Sha1Obscurer, Store};

/// A macro to easily implement async traits methods.
pub use async_trait::async_trait;

pub use tokio;
