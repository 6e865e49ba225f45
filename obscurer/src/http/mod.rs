//! The HTTP layer the obscuring pipeline plugs into.
pub mod error;
pub mod handler;
pub mod head;
pub mod headers;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod url;
pub mod writer;

pub use error::Error;
pub use handler::Handler;
pub use head::{Head, Method, Version};
pub use headers::Headers;
pub use request::Request;
pub use response::{Response, Status};
pub use router::Router;
pub use server::Server;
pub use url::Url;
pub use writer::ResponseWriter;
