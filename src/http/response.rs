use std::io::{self, Write};

/// An outbound HTTP response: status code, ordered headers, body.
///
/// Headers keep their insertion order on the wire; setting a header that is
/// already present replaces it instead of duplicating it.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// The single 414 reply sent when a request line exceeds the cap.
    pub fn uri_too_long() -> Self {
        let mut response = Response::new(414);
        response.add_header("Content-Type", "text/plain;charset=utf-8");
        response.add_header("Connection", "close");
        response.set_body(b"Request line too long".to_vec());
        response
    }

    /// The single 400 reply sent when a request cannot be parsed at all.
    pub fn bad_request() -> Self {
        let mut response = Response::new(400);
        response.add_header("Content-Type", "text/plain;charset=utf-8");
        response.add_header("Connection", "close");
        response.set_body(b"Bad request".to_vec());
        response
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Adds a header, replacing an existing one with the same name
    /// (case-insensitive).
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(header) => header.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Sets the body and the matching Content-Length header.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.add_header("Content-Length", &body.len().to_string());
        self.body = body;
    }

    /// Serializes the response onto `writer`: status line, headers in
    /// insertion order, blank line, body.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\n",
            self.status,
            reason_phrase(self.status)
        )?;

        for (name, value) in &self.headers {
            write!(writer, "{}: {}\r\n", name, value)?;
        }

        writer.write_all(b"\r\n")?;
        writer.write_all(&self.body)?;
        writer.flush()
    }
}

/// The standard reason phrase for a status code, or "Unknown" for codes
/// outside the common set.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        410 => "Gone",
        414 => "URI Too Long",
        418 => "I'm a teapot",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
