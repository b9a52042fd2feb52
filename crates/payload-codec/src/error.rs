use payload_types::PayloadTypesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A schema path is missing, unreadable or does not parse.
    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    #[error("no such type: {0}")]
    TypeNotFound(String),

    /// The payload failed verification against the message type.
    #[error("{0}")]
    Validation(String),

    /// Wire-format failure: a malformed buffer, or an encode failure after
    /// verification passed.
    #[error("Protobuf codec error: {0}")]
    Codec(String),

    /// Any failure on the decode path, carrying the original error's message.
    #[error("{0}")]
    Decode(#[source] Box<Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The underlying error, looking through a decode wrapper.
    pub fn root(&self) -> &Error {
        match self {
            Error::Decode(inner) => inner.root(),
            other => other,
        }
    }
}

impl From<PayloadTypesError> for Error {
    fn from(err: PayloadTypesError) -> Self {
        match err {
            PayloadTypesError::Verification(message) => Error::Validation(message),
            PayloadTypesError::TypeConversion(message) => Error::Codec(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
