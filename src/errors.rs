use thiserror::Error;

/// Raised when raw request text does not follow `<METHOD> <PATH> <VERSION>`
/// framing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("request is empty")]
    Empty,
    #[error("malformed request line '{0}', expected '<METHOD> <PATH> <VERSION>'")]
    RequestLine(String),
    #[error("malformed header '{header}' in line {line}, expected 'Name: value'")]
    Header { header: String, line: usize },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("couldn't parse export: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("character {0:?} can't be represented in latin-1")]
    NotLatin1(char),
    #[error("item {0} has no request content")]
    EmptyRequest(String),
}
