//! HTTP request decoder module
//!
//! Decodes one request head, line by line, from a streaming buffer. The decoder
//! keeps its progress between calls so a head split across many reads is
//! handled the same as one arriving in a single segment.
//!
//! No body is decoded: once the empty line ending the header section has been
//! consumed the head is returned and any bytes after it stay in the buffer
//! untouched, whatever `Content-Length` says.
//!
//! # Example
//!
//! ```
//! use flv_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /stats HTTP/1.0\r\nX-A: 1\r\nX-A: 2\r\n\r\n");
//! let head = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(head.path(), "/stats");
//! assert_eq!(head.headers().get("X-A"), Some("1, 2"));
//! ```

use std::mem;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::header::{RequestLine, is_terminator, parse_header_line, parse_request_line};
use crate::ensure;
use crate::protocol::{HeaderFields, ParseError, RequestHead};

/// Maximum number of header lines allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire head, request line included
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// A decoder for the request line and header fields of a request
///
/// # State Machine
///
/// - `RequestLine`: waiting for the first line
/// - `Headers`: request line accepted, collecting header lines until `CRLF`
#[derive(Debug)]
pub struct RequestDecoder {
    state: State,
    headers: HeaderFields,
    header_num: usize,
    consumed: usize,
}

#[derive(Debug)]
enum State {
    RequestLine,
    Headers(RequestLine),
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: State::RequestLine, headers: HeaderFields::new(), header_num: 0, consumed: 0 }
    }
}

impl Decoder for RequestDecoder {
    type Item = RequestHead;
    type Error = ParseError;

    /// Attempts to decode a request head from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(head))`: the empty line ending the head was consumed
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: a line broke the grammar or a limit was exceeded
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(end) = src.iter().position(|b| *b == b'\n') else {
                let pending = self.consumed + src.len();
                ensure!(pending <= MAX_HEADER_BYTES, ParseError::too_large_header(pending, MAX_HEADER_BYTES));
                return Ok(None);
            };

            let line = src.split_to(end + 1);
            self.consumed += line.len();
            ensure!(self.consumed <= MAX_HEADER_BYTES, ParseError::too_large_header(self.consumed, MAX_HEADER_BYTES));

            match mem::replace(&mut self.state, State::RequestLine) {
                State::RequestLine => {
                    let request_line = parse_request_line(&line)?;
                    trace!(method = %request_line.method, path = %request_line.path, "parsed request line");
                    self.state = State::Headers(request_line);
                }
                State::Headers(request_line) if is_terminator(&line) => {
                    self.header_num = 0;
                    self.consumed = 0;
                    return Ok(Some(request_line.into_head(mem::take(&mut self.headers))));
                }
                State::Headers(request_line) => {
                    ensure!(self.header_num < MAX_HEADER_NUM, ParseError::too_many_headers(MAX_HEADER_NUM));
                    let (name, value) = parse_header_line(&line)?;
                    self.headers.append(name, value);
                    self.header_num += 1;
                    self.state = State::Headers(request_line);
                }
            }
        }
    }

    /// Called once the peer has closed its side. A head that is not complete
    /// by now never will be.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(head) => Ok(Some(head)),
            None => Err(ParseError::unexpected_eof(buf)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use indoc::indoc;

    fn crlf(s: &str) -> String {
        s.replace('\n', "\r\n")
    }

    #[test]
    fn from_curl() {
        let str = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let mut buf = BytesMut::from(str.as_str());
        let head = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method(), &Method::GET);
        assert_eq!(head.path(), "/index.html");
        assert_eq!(head.version(), "HTTP/1.1");
        assert_eq!(head.headers().len(), 3);
        assert_eq!(head.headers().get("Host"), Some("127.0.0.1:8080"));
        assert_eq!(head.headers().get("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(head.headers().get("Accept"), Some("*/*"));
        assert_eq!(head.headers().get("accept"), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut buf = BytesMut::from("GET /live/foo HTTP/1.0\r\nX-A: 1\r\nX-B: b\r\nX-A: 2\r\n\r\n");
        let head = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers().get("X-A"), Some("1, 2"));
        assert_eq!(head.headers().get("X-B"), Some("b"));
    }

    #[test]
    fn body_is_left_in_buffer() {
        let mut buf = BytesMut::from("POST /upload HTTP/1.0\r\nContent-Length: 3\r\n\r\n123");
        let head = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method(), &Method::POST);
        assert_eq!(&buf[..], b"123");
    }

    #[test]
    fn byte_by_byte_input() {
        let raw = b"GET /stats HTTP/1.0\r\nHost: a\r\n\r\n";
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        for (i, b) in raw.iter().enumerate() {
            buf.extend_from_slice(&[*b]);
            let result = decoder.decode(&mut buf).unwrap();
            if i + 1 < raw.len() {
                assert!(result.is_none(), "completed early at byte {i}");
            } else {
                let head = result.unwrap();
                assert_eq!(head.path(), "/stats");
                assert_eq!(head.headers().get("Host"), Some("a"));
            }
        }
    }

    #[test]
    fn decoder_is_reusable() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET /a HTTP/1.0\r\nX: 1\r\n\r\nGET /b HTTP/1.0\r\n\r\n");

        let first = decoder.decode(&mut buf).unwrap().unwrap();
        let second = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(first.path(), "/a");
        assert_eq!(second.path(), "/b");
        assert!(second.headers().is_empty());
    }

    #[test]
    fn invalid_request_line() {
        let mut buf = BytesMut::from("get /stats HTTP/1.0\r\n\r\n");
        let err = RequestDecoder::new().decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRequestLine { .. }));
    }

    #[test]
    fn invalid_header_line() {
        let mut buf = BytesMut::from("GET /stats HTTP/1.0\r\nbroken header\r\n\r\n");
        let err = RequestDecoder::new().decode(&mut buf).unwrap_err();
        match err {
            ParseError::InvalidHeaderLine { line } => assert_eq!(line, "broken header\r\n"),
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn eof_before_terminator() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET /stats HTTP/1.0\r\nHost: a\r\n");

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        let err = decoder.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn eof_inside_a_line() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET /stats HTTP/1.0\r\nHost: a\r");

        let err = decoder.decode_eof(&mut buf).unwrap_err();
        match err {
            ParseError::UnexpectedEof { pending } => assert_eq!(pending, "Host: a\r"),
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn eof_on_empty_connection() {
        let err = RequestDecoder::new().decode_eof(&mut BytesMut::new()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn too_large_header() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET /stats HTTP/1.0\r\n");
        buf.extend_from_slice(format!("X-Big: {}", "a".repeat(MAX_HEADER_BYTES)).as_bytes());

        let err = decoder.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { max_size: MAX_HEADER_BYTES, .. }));
    }

    #[test]
    fn too_many_headers() {
        let mut raw = String::from("GET /stats HTTP/1.0\r\n");
        for i in 0..=MAX_HEADER_NUM {
            raw.push_str(&format!("X-{i}: v\r\n"));
        }
        raw.push_str("\r\n");

        let err = RequestDecoder::new().decode(&mut BytesMut::from(raw.as_str())).unwrap_err();
        assert!(matches!(err, ParseError::TooManyHeaders { max_num: MAX_HEADER_NUM }));
    }
}
