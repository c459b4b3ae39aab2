//! The one-shot capture server: accepts connections until exactly one
//! well-formed request has been read and answered, then returns the
//! captured record.

use std::{
    io::{self, BufReader, BufWriter, Read, Write},
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
    sync::{Arc, atomic::{AtomicBool, Ordering}},
    thread,
    time::{Duration, Instant},
};

use chrono::Utc;
use thiserror::Error;

use crate::{
    api::{CaptureHandler, RequestHandler},
    http::{self, ParseError, Response},
    types::{CapturedRequest, ListenConfig},
};

/// How often the accept loop wakes up to check the deadline and the
/// cancellation flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Largest request body the server will drain before replying.
const MAX_BODY_DRAIN: u64 = 1024 * 1024;

const USER_AGENT_HEADER: &str = "User-Agent";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("no request received within {0:?}")]
    Timeout(Duration),

    #[error("capture cancelled before a request was received")]
    Cancelled,
}

/// Waits for a single HTTP request and returns the captured record.
///
/// Binds `bind_address:bind_port` from the configuration and serves exactly
/// one successfully parsed request with the configured response, via the
/// standard [`CaptureHandler`]. Connections that cannot be parsed are
/// answered with a single error response (414 for an over-long request
/// line, 400 otherwise) and do not consume the capture: the listener keeps
/// waiting for the next connection until `timeout` elapses.
///
/// # Arguments
///
/// * `config` - Where to listen and what to answer
/// * `timeout` - Overall budget for the capture; when it elapses without a
///   successfully parsed request the result is [`CaptureError::Timeout`]
/// * `cancel` - Cooperative cancellation flag, checked between accept
///   attempts; when set the result is [`CaptureError::Cancelled`]
///
/// # Resource Handling
///
/// The listening socket is owned by this call and released on every exit
/// path - success, timeout, cancellation, or bind failure. A read already
/// in progress on an accepted connection is bounded by the configured
/// per-connection read timeout, clamped to the remaining overall budget.
///
/// # Example
///
/// ```
/// let config = ListenConfig::new(8080);
/// let cancel = Arc::new(AtomicBool::new(false));
/// let capture = server::capture_request(config, Duration::from_secs(60), cancel)?;
/// println!("{} {} from {}", capture.method, capture.path, capture.client_addr);
/// ```
pub fn capture_request(
    config: ListenConfig,
    timeout: Duration,
    cancel: Arc<AtomicBool>,
) -> Result<CapturedRequest, CaptureError> {
    let handler = CaptureHandler::new(&config);
    run(&config, &handler, timeout, &cancel)
}

/// The accept loop behind [`capture_request`], generic over the handler so
/// callers can substitute their own [`RequestHandler`].
pub fn run<H: RequestHandler>(
    config: &ListenConfig,
    handler: &H,
    timeout: Duration,
    cancel: &AtomicBool,
) -> Result<CapturedRequest, CaptureError> {
    let addr = config.endpoint();
    let listener = TcpListener::bind(&addr).map_err(|source| CaptureError::Bind {
        addr: addr.clone(),
        source,
    })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| CaptureError::Bind { addr, source })?;

    let deadline = Instant::now() + timeout;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(CaptureError::Cancelled);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(CaptureError::Timeout(timeout));
        }

        match listener.accept() {
            Ok((stream, peer)) => {
                let per_connection = config
                    .read_timeout
                    .min(remaining)
                    .max(Duration::from_millis(1));
                if let Some(capture) = serve_connection(stream, peer, per_connection, handler) {
                    return Ok(capture);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL.min(remaining));
            }
            Err(_) => {
                // transient accept failure; keep waiting
                thread::sleep(ACCEPT_POLL_INTERVAL.min(remaining));
            }
        }
    }
}

/// Serves one accepted connection. Returns the capture when the request
/// parsed cleanly; returns None after answering (or dropping) anything
/// else, so the accept loop keeps waiting.
fn serve_connection<H: RequestHandler>(
    stream: TcpStream,
    peer: SocketAddr,
    per_connection: Duration,
    handler: &H,
) -> Option<CapturedRequest> {
    // the accepted socket inherits non-blocking from the listener
    if stream.set_nonblocking(false).is_err() {
        return None;
    }
    let _ = stream.set_read_timeout(Some(per_connection));
    let _ = stream.set_write_timeout(Some(per_connection));

    let mut reader = BufReader::new(&stream);

    match http::read_request(&mut reader) {
        Ok(request) => {
            // Drain the declared body so the close is graceful before the
            // client finished sending.
            if let Some(length) = request.content_length() {
                let _ = io::copy(
                    &mut reader.by_ref().take(length.min(MAX_BODY_DRAIN)),
                    &mut io::sink(),
                );
            }

            let reply = handler.handle(&request);

            let mut writer = BufWriter::new(&stream);
            let _ = reply.response.write_to(&mut writer);
            let _ = writer.flush();
            let _ = stream.shutdown(Shutdown::Both);

            Some(snapshot(&request, peer, reply.request_id))
        }
        Err(ParseError::LineTooLong) => {
            // One response per connection: the 414 replaces the handler
            // response, never precedes it.
            respond_and_close(&stream, Response::uri_too_long());
            None
        }
        Err(ParseError::Malformed(_)) => {
            respond_and_close(&stream, Response::bad_request());
            None
        }
        Err(ParseError::UnexpectedEof) | Err(ParseError::Io(_)) => None,
    }
}

/// Writes an error response, then drains the unread tail of the request so
/// the close is graceful and the response is not lost to a reset.
fn respond_and_close(mut stream: &TcpStream, response: Response) {
    let mut writer = BufWriter::new(stream);
    if response.write_to(&mut writer).is_err() {
        return;
    }
    let _ = writer.flush();
    let _ = stream.shutdown(Shutdown::Write);

    let mut sink = [0u8; 4096];
    loop {
        match stream.read(&mut sink) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

fn snapshot(request: &http::Request, peer: SocketAddr, request_id: String) -> CapturedRequest {
    CapturedRequest {
        request_id,
        method: request.method.clone(),
        path: request.path.clone(),
        client_addr: peer.to_string(),
        user_agent: request.header(USER_AGENT_HEADER).map(str::to_string),
        headers: request.headers.iter().cloned().collect(),
        received_at: Utc::now().timestamp() as u64,
    }
}
