use crate::{
    http::{Request, Response},
    types::ListenConfig,
    utils,
};

/// What a handler produces for one request: the wire response plus the
/// correlation id that response carries.
#[derive(Debug)]
pub struct Reply {
    pub response: Response,
    pub request_id: String,
}

/// The behavior the server loop dispatches a successfully parsed request
/// to. Implementations must be infallible: by the time a request reaches a
/// handler it is well-formed, and the handler's only job is to describe the
/// response.
pub trait RequestHandler {
    fn handle(&self, request: &Request) -> Reply;
}

/// The standard handler: answers every request with the configured status,
/// headers, and body, and correlates request and response.
pub struct CaptureHandler {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    correlation_header: String,
}

impl CaptureHandler {
    pub fn new(config: &ListenConfig) -> Self {
        CaptureHandler {
            status: config.response_status,
            headers: config.response_headers.clone(),
            body: config.response_body.clone(),
            correlation_header: config.correlation_header.clone(),
        }
    }
}

impl RequestHandler for CaptureHandler {
    fn handle(&self, request: &Request) -> Reply {
        // Echo the caller's correlation id when it sent one
        let request_id = request
            .header(&self.correlation_header)
            .map(str::to_string)
            .unwrap_or_else(utils::generate_request_id);

        let mut response = Response::new(self.status);
        for (name, value) in &self.headers {
            response.add_header(name, value);
        }
        response.add_header(&self.correlation_header, &request_id);
        response.add_header("Connection", "close");
        response.set_body(self.body.clone());

        Reply {
            response,
            request_id,
        }
    }
}
