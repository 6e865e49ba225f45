use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(&'static str),

    #[error("malformed url \"{url}\": {reason}")]
    MalformedUrl { url: String, reason: &'static str },

    #[error("{0}")]
    Handler(#[from] Box<dyn std::error::Error + Sync + Send>),
}

impl Error {
    /// Wrap any error returned by a handler.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::Handler(Box::new(err))
    }

    pub(crate) fn malformed_url(url: &str, reason: &'static str) -> Error {
        Error::MalformedUrl {
            url: url.to_string(),
            reason,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) | Self::MalformedUrl { .. } => 400,
            _ => 500,
        }
    }
}
