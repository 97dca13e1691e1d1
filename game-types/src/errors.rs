use thiserror::Error;

/// Failures turning a raw request line into a [`crate::Request`].
///
/// A line that fails to parse is a protocol violation: the server answers
/// NOTOK and tears the session down rather than guessing at intent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty request")]
    EmptyRequest,
    #[error("unknown verb: {0}")]
    UnknownVerb(String),
    #[error("{verb} is missing the {name} argument")]
    MissingArgument { verb: String, name: &'static str },
}
