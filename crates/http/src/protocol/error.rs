use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

impl HttpError {
    /// Returns true if the request could not be parsed, as opposed to a failure
    /// while writing the response.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, HttpError::RequestError { .. })
    }
}

/// The request did not conform to the accepted grammar.
///
/// Line variants carry the literal line as received so the log shows exactly
/// what the peer sent.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid request line: {line:?}")]
    InvalidRequestLine { line: String },

    #[error("invalid header line: {line:?}")]
    InvalidHeaderLine { line: String },

    #[error("connection closed before the request was complete, pending: {pending:?}")]
    UnexpectedEof { pending: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line(line: &[u8]) -> Self {
        Self::InvalidRequestLine { line: String::from_utf8_lossy(line).into_owned() }
    }

    pub fn invalid_header_line(line: &[u8]) -> Self {
        Self::InvalidHeaderLine { line: String::from_utf8_lossy(line).into_owned() }
    }

    pub fn unexpected_eof(pending: &[u8]) -> Self {
        Self::UnexpectedEof { pending: String::from_utf8_lossy(pending).into_owned() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("can't spawn decoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn spawn<S: ToString>(program: S, source: io::Error) -> Self {
        Self::Spawn { program: program.to_string(), source }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_errors_show_literal_content() {
        let e = ParseError::invalid_request_line(b"get / HTTP/1.0\r\n");
        assert_eq!(e.to_string(), r#"invalid request line: "get / HTTP/1.0\r\n""#);

        let e = ParseError::invalid_header_line(b"no-colon\r\n");
        assert_eq!(e.to_string(), r#"invalid header line: "no-colon\r\n""#);
    }

    #[test]
    fn classify_http_error() {
        let parse: HttpError = ParseError::unexpected_eof(b"").into();
        assert!(parse.is_parse_error());

        let send: HttpError = SendError::invalid_body("boom").into();
        assert!(!send.is_parse_error());
    }
}
