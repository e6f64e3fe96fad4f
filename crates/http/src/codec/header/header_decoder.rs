//! Line grammar of the request head.
//!
//! Every function here receives one complete line including its trailing
//! `\n` and either accepts it or rejects it with the literal line attached.
//!
//! - request line: `METHOD SP PATH SP VERSION CRLF`, METHOD is `[A-Z]+`, PATH
//!   and VERSION are runs of non-whitespace bytes
//! - header line: `NAME ":" OWS VALUE CRLF`, NAME is any run of non-`:` bytes,
//!   VALUE has at least one byte
//!
//! Leading whitespace of VALUE is dropped, but never its last byte: `X:  \r\n`
//! yields the value `" "`.

use http::Method;

use crate::ensure;
use crate::protocol::{HeaderFields, ParseError, RequestHead};

const CRLF: &[u8] = b"\r\n";

/// Method, path and version of a request line that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) version: String,
}

impl RequestLine {
    pub(crate) fn into_head(self, headers: HeaderFields) -> RequestHead {
        RequestHead::new(self.method, self.path, self.version, headers)
    }
}

/// Returns true if `line` is the empty line that closes the header section.
#[inline]
pub(crate) fn is_terminator(line: &[u8]) -> bool {
    line == CRLF
}

pub(crate) fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let invalid = || ParseError::invalid_request_line(line);

    let content = line.strip_suffix(CRLF).ok_or_else(invalid)?;

    let mut parts = content.split(|b| *b == b' ');
    let (Some(method), Some(path), Some(version), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    ensure!(!method.is_empty() && method.iter().all(u8::is_ascii_uppercase), invalid());
    ensure!(is_token(path) && is_token(version), invalid());

    let method = Method::from_bytes(method).map_err(|_| invalid())?;
    let path = std::str::from_utf8(path).map_err(|_| invalid())?;
    let version = std::str::from_utf8(version).map_err(|_| invalid())?;

    Ok(RequestLine { method, path: path.to_owned(), version: version.to_owned() })
}

pub(crate) fn parse_header_line(line: &[u8]) -> Result<(&str, &str), ParseError> {
    let invalid = || ParseError::invalid_header_line(line);

    let content = line.strip_suffix(CRLF).ok_or_else(invalid)?;

    let colon = content.iter().position(|b| *b == b':').ok_or_else(invalid)?;
    let (name, rest) = (&content[..colon], &content[colon + 1..]);
    ensure!(!name.is_empty() && !rest.is_empty(), invalid());

    let skip = rest[..rest.len() - 1].iter().take_while(|b| is_space(**b)).count();
    let value = &rest[skip..];

    let name = std::str::from_utf8(name).map_err(|_| invalid())?;
    let value = std::str::from_utf8(value).map_err(|_| invalid())?;

    Ok((name, value))
}

/// One or more bytes, none of them whitespace.
#[inline]
fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && !bytes.iter().any(|b| is_space(*b))
}

/// Space, tab, CR, LF, vertical tab and form feed.
#[inline]
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}
