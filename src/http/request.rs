use std::io::{BufRead, Read};

use thiserror::Error;

/// Longest accepted request line, in raw bytes including the line ending.
/// Anything longer gets a 414 instead of being parsed.
pub const MAX_LINE_LENGTH: usize = 65536;

/// Upper bound on the number of header lines read from one request.
const MAX_HEADERS: usize = 100;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line exceeds the maximum length")]
    LineTooLong,

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("connection closed before a full request arrived")]
    UnexpectedEof,

    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed inbound request: the request line plus headers. The body, if
/// any, stays on the wire; the listener drains it separately.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Looks up a header by name, case-insensitively. Returns the first
    /// match when the request repeats a header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The declared body length, when the request carries one.
    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }
}

/// Reads and parses one request from `reader`.
///
/// Reads the request line and header block, leaving any body unread. The
/// request line and every header line are individually capped at
/// [`MAX_LINE_LENGTH`] bytes; an over-long line yields
/// [`ParseError::LineTooLong`]. A connection that closes before delivering
/// a full line yields [`ParseError::UnexpectedEof`], and anything that is
/// not recognizable HTTP yields [`ParseError::Malformed`].
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request, ParseError> {
    let request_line = read_line(reader)?;
    let (method, path, version) = parse_request_line(&request_line)?;

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader)?;
        if line.is_empty() {
            break;
        }

        if headers.len() >= MAX_HEADERS {
            return Err(ParseError::Malformed("too many headers".to_string()));
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(ParseError::Malformed(format!("invalid header '{}'", line)));
        };

        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    Ok(Request {
        method,
        path,
        version,
        headers,
    })
}

fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    if line.is_empty() {
        return Err(ParseError::Malformed("empty request line".to_string()));
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(ParseError::Malformed(format!(
            "invalid request line '{}'",
            line
        )));
    }

    let version = parts[2];
    if !version.starts_with("HTTP/") {
        return Err(ParseError::Malformed(format!(
            "invalid protocol version '{}'",
            version
        )));
    }

    Ok((
        parts[0].to_string(),
        parts[1].to_string(),
        version.to_string(),
    ))
}

/// Reads one line, bounded at MAX_LINE_LENGTH raw bytes. Returns the line
/// with the trailing CRLF stripped; an immediate EOF is UnexpectedEof.
fn read_line<R: BufRead>(reader: &mut R) -> Result<String, ParseError> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take((MAX_LINE_LENGTH + 1) as u64)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Err(ParseError::UnexpectedEof);
    }
    if read > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong);
    }

    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }

    String::from_utf8(buf).map_err(|_| ParseError::Malformed("request is not valid UTF-8".to_string()))
}
