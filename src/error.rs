//! Error types for the reflow-oven-sim crate.

use thiserror::Error;

/// Failure to decode a protocol line.
///
/// Parse failures are scoped to a single command: the server logs them and
/// keeps the connection open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line had fewer `;`-separated fields than the command requires.
    #[error("missing fields: expected {expected}, found {found}")]
    MissingFields {
        /// Number of fields the command requires.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// A numeric field could not be parsed as its expected type.
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// The line did not begin with the expected keyword.
    #[error("unexpected keyword: expected {expected}, found {found:?}")]
    UnexpectedKeyword {
        /// The keyword that was expected.
        expected: &'static str,
        /// The keyword that was found.
        found: String,
    },

    /// The status field named no known oven status.
    #[error("unknown oven status: {0:?}")]
    UnknownStatus(String),
}

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listening address is already taken by another process.
    #[error("Address already in use: {addr}")]
    AddressInUse {
        /// The address that could not be bound.
        addr: String,
    },

    /// Binding the listening socket failed for a reason other than the
    /// address being in use.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A protocol line could not be decoded.
    #[error("Protocol parse error: {0}")]
    Parse(#[from] ParseError),

    /// The peer closed the connection.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// A peer sent more than `limit` bytes without a line terminator.
    #[error("Line exceeds {limit} bytes without a terminator")]
    LineTooLong {
        /// The partial-line limit in bytes.
        limit: usize,
    },

    /// No reply arrived within the configured timeout.
    #[error("Timed out waiting for reply")]
    Timeout,

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },
}

impl Error {
    /// Classify a bind failure, keeping "address in use" distinct.
    pub(crate) fn from_bind(addr: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            Self::AddressInUse {
                addr: addr.to_string(),
            }
        } else {
            Self::Bind {
                addr: addr.to_string(),
                source,
            }
        }
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
