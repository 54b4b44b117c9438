//! Error types for the PDF writer.
//!
//! Only structural failures surface here. Resource problems (a missing font
//! file, a PNG the writer cannot embed) degrade gracefully and are recorded
//! in the document's message log instead.

use crate::fonts::font_subsetter::SubsetError;
use crate::fonts::truetype_parser::TrueTypeError;
use crate::store::ObjectKind;
use crate::writer::ImageError;

/// Result type alias for PDF writer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or serializing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An id was allocated but no object was registered for it
    #[error("Dangling reference: object {0} was allocated but never populated")]
    DanglingReference(u32),

    /// An id beyond the allocated range was requested
    #[error("Unknown object: {0} 0 R has not been allocated")]
    UnknownObject(u32),

    /// Object has a different kind than the caller expected
    #[error("Unexpected object kind for {id} 0 R: expected {expected:?}, found {found:?}")]
    UnexpectedObject {
        /// Object id
        id: u32,
        /// Kind the caller asked for
        expected: ObjectKind,
        /// Kind actually stored
        found: ObjectKind,
    },

    /// The id does not name a loose object
    #[error("Object {0} is not a loose object")]
    NotLooseObject(u32),

    /// close_object() with no open diversion
    #[error("No object is open")]
    NoOpenObject,

    /// restore() with nothing saved
    #[error("Graphics state stack is empty")]
    EmptyStateStack,

    /// Transaction verb used without a matching start
    #[error("No transaction is in progress")]
    NoTransaction,

    /// HTTP headers were emitted before streaming began
    #[error("Unable to stream pdf: headers already sent")]
    HeadersAlreadySent,

    /// An optional decoding capability was compiled out
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    /// Invalid argument passed to a drawing or document call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Font program could not be parsed
    #[error("Font error: {0}")]
    Font(#[from] TrueTypeError),

    /// Font subsetting failed
    #[error("Subset error: {0}")]
    Subset(#[from] SubsetError),

    /// Image data could not be embedded
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_reference_error() {
        let err = Error::DanglingReference(12);
        let msg = format!("{}", err);
        assert!(msg.contains("Dangling reference"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_unexpected_object_error() {
        let err = Error::UnexpectedObject {
            id: 3,
            expected: ObjectKind::Page,
            found: ObjectKind::Pages,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("3 0 R"));
        assert!(msg.contains("Page"));
        assert!(msg.contains("Pages"));
    }

    #[test]
    fn test_headers_already_sent_error() {
        let msg = format!("{}", Error::HeadersAlreadySent);
        assert!(msg.contains("headers already sent"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(format!("{}", err).contains("gone"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
