use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Errors produced while decoding XML or writing JSON.
///
/// The type is `Clone` so an [`Encoder`](crate::Encoder) can return the same
/// error on every call after a failed write.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The XML token stream is malformed.
    #[error("malformed XML: {0}")]
    Syntax(#[source] Arc<quick_xml::Error>),

    /// A tag name, attribute name or CDATA section is not valid UTF-8.
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// The input ended while this element was still open.
    #[error("unexpected end of input: <{0}> is never closed")]
    UnclosedElement(String),

    /// An end tag arrived with no element open.
    #[error("closing tag </{0}> has no matching start tag")]
    UnexpectedEnd(String),

    /// Writing to the output sink failed.
    #[error("failed to write JSON: {0}")]
    Sink(#[source] Arc<io::Error>),

    /// The encoded output could not be read back as a JSON value.
    #[error("encoded output is not valid JSON: {0}")]
    Json(#[source] Arc<serde_json::Error>),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Syntax(Arc::new(err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Sink(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
