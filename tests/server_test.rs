use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use reqtrap::server::{self, CaptureError};
use reqtrap::types::{CapturedRequest, ListenConfig};

// Helper function to create a loopback config on a fresh port
fn test_config() -> ListenConfig {
    let mut config = ListenConfig::new(free_port());
    config.bind_address = "127.0.0.1".to_string();
    config.read_timeout = Duration::from_millis(500);
    config
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

// Helper function to run a capture in the background
fn spawn_capture(
    config: ListenConfig,
    timeout: Duration,
) -> (
    thread::JoinHandle<Result<CapturedRequest, CaptureError>>,
    Arc<AtomicBool>,
) {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let handle = thread::spawn(move || server::capture_request(config, timeout, flag));
    (handle, cancel)
}

// Helper function to connect to the listener, retrying while it binds
fn connect(port: u16) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)) {
            return stream;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("could not connect to 127.0.0.1:{}", port);
}

// Helper function to send raw bytes and read the full response
fn send_raw(port: u16, payload: &[u8]) -> String {
    let mut stream = connect(port);
    stream.write_all(payload).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

// Helper function to extract a response header value
fn response_header(response: &str, name: &str) -> Option<String> {
    for line in response.lines().skip(1) {
        if line.is_empty() {
            break;
        }
        if let Some((header, value)) = line.split_once(':') {
            if header.trim().eq_ignore_ascii_case(name) {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

fn is_uuid(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    s.char_indices().all(|(i, c)| match i {
        8 | 13 | 18 | 23 => c == '-',
        _ => c.is_ascii_hexdigit(),
    })
}

#[test]
fn test_basic_capture() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(port, b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("\r\n\r\nSuccess"));
    assert_eq!(
        response_header(&response, "Content-Type").as_deref(),
        Some("text/html;charset=utf-8")
    );
    assert!(response_header(&response, "Server").is_some());
    assert!(response_header(&response, "X-Request-ID").is_some());

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.method, "GET");
    assert_eq!(capture.path, "/health");
    assert!(capture.client_addr.starts_with("127.0.0.1:"));
    assert_eq!(capture.headers.get("Host").map(String::as_str), Some("localhost"));
    assert!(capture.user_agent.is_none());
    assert!(capture.received_at > 0);
}

#[test]
fn test_configured_response() {
    let mut config = test_config();
    config.response_status = 418;
    config.response_body = b"teapot".to_vec();
    config.set_response_header("X-Custom", "yes");
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(port, b"GET /brew HTTP/1.1\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
    assert!(response.ends_with("teapot"));
    assert_eq!(response_header(&response, "X-Custom").as_deref(), Some("yes"));
    // configured headers are added to the defaults, not replacing them
    assert_eq!(
        response_header(&response, "Content-Type").as_deref(),
        Some("text/html;charset=utf-8")
    );

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.path, "/brew");
}

#[test]
fn test_correlation_id_is_echoed() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(
        port,
        b"GET / HTTP/1.1\r\nX-Request-ID: trace-123\r\n\r\n",
    );

    assert_eq!(
        response_header(&response, "X-Request-ID").as_deref(),
        Some("trace-123")
    );

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.request_id, "trace-123");
}

#[test]
fn test_correlation_id_is_generated_when_absent() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(port, b"GET / HTTP/1.1\r\n\r\n");

    let capture = handle.join().unwrap().unwrap();
    assert!(is_uuid(&capture.request_id));

    // the generated id and the one on the wire are the same value
    assert_eq!(
        response_header(&response, "X-Request-ID").as_deref(),
        Some(capture.request_id.as_str())
    );
}

#[test]
fn test_generated_ids_differ_across_runs() {
    let mut ids = Vec::new();

    for _ in 0..2 {
        let config = test_config();
        let port = config.bind_port;
        let (handle, _) = spawn_capture(config, Duration::from_secs(5));
        send_raw(port, b"GET / HTTP/1.1\r\n\r\n");
        ids.push(handle.join().unwrap().unwrap().request_id);
    }

    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_custom_correlation_header_name() {
    let mut config = test_config();
    config.correlation_header = "X-Correlation-ID".to_string();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(
        port,
        b"GET / HTTP/1.1\r\nX-Correlation-ID: corr-9\r\n\r\n",
    );

    assert_eq!(
        response_header(&response, "X-Correlation-ID").as_deref(),
        Some("corr-9")
    );
    assert_eq!(handle.join().unwrap().unwrap().request_id, "corr-9");
}

#[test]
fn test_request_line_too_long_gets_one_414_then_recovers() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(10));

    let mut payload = Vec::new();
    payload.extend_from_slice(b"GET /");
    payload.extend(std::iter::repeat(b'a').take(70000));
    payload.extend_from_slice(b" HTTP/1.1\r\n\r\n");

    let response = send_raw(port, &payload);

    assert!(response.starts_with("HTTP/1.1 414 URI Too Long\r\n"));
    // exactly one response on the connection
    assert_eq!(response.matches("HTTP/1.1 ").count(), 1);

    // the run is still live and captures the next well-formed request
    let response = send_raw(port, b"GET /second HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.path, "/second");
}

#[test]
fn test_malformed_request_gets_400_then_recovers() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(10));

    let response = send_raw(port, b"THIS IS NOT A REQUEST\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = send_raw(port, b"GET /after HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.path, "/after");
}

#[test]
fn test_timeout_releases_port() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_millis(300));

    let result = handle.join().unwrap();
    assert!(matches!(result, Err(CaptureError::Timeout(_))));

    // the listener is gone; the port can be bound again
    TcpListener::bind(("127.0.0.1", port)).unwrap();
}

#[test]
fn test_cancellation_is_distinct_from_timeout() {
    let config = test_config();
    let (handle, cancel) = spawn_capture(config, Duration::from_secs(30));

    thread::sleep(Duration::from_millis(150));
    let start = Instant::now();
    cancel.store(true, Ordering::Relaxed);

    let result = handle.join().unwrap();
    assert!(matches!(result, Err(CaptureError::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_bind_failure() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();

    let mut config = ListenConfig::new(occupied.local_addr().unwrap().port());
    config.bind_address = "127.0.0.1".to_string();

    let cancel = Arc::new(AtomicBool::new(false));
    let result = server::capture_request(config, Duration::from_secs(1), cancel);
    assert!(matches!(result, Err(CaptureError::Bind { .. })));
}

#[test]
fn test_post_with_body_is_captured() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    let response = send_raw(
        port,
        b"POST /hook HTTP/1.1\r\nContent-Length: 9\r\nContent-Type: text/plain\r\n\r\nsome data",
    );
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.method, "POST");
    assert_eq!(capture.path, "/hook");
    assert_eq!(
        capture.headers.get("Content-Length").map(String::as_str),
        Some("9")
    );
}

#[test]
fn test_reqwest_client_roundtrip() {
    let config = test_config();
    let port = config.bind_port;
    let (handle, _) = spawn_capture(config, Duration::from_secs(5));

    // give the listener a moment to bind before reqwest connects
    connect(port);

    let response = reqwest::blocking::Client::new()
        .get(format!("http://127.0.0.1:{}/callback?code=abc", port))
        .header("User-Agent", "reqtrap-test")
        .header("X-Request-ID", "rq-1")
        .send()
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("X-Request-ID")
            .and_then(|v| v.to_str().ok()),
        Some("rq-1")
    );
    assert_eq!(response.text().unwrap(), "Success");

    let capture = handle.join().unwrap().unwrap();
    assert_eq!(capture.method, "GET");
    assert_eq!(capture.path, "/callback?code=abc");
    assert_eq!(capture.user_agent.as_deref(), Some("reqtrap-test"));
    assert_eq!(capture.request_id, "rq-1");
}
