use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::config;

/// Everything the listener needs to know before it starts: where to bind
/// and what to answer. Immutable once the server is running.
#[derive(Debug, Clone)]
pub struct ListenConfig {
    pub bind_address: String,
    pub bind_port: u16,
    pub response_status: u16,
    pub response_headers: Vec<(String, String)>,
    pub response_body: Vec<u8>,
    pub correlation_header: String,
    pub read_timeout: Duration,
}

impl ListenConfig {
    pub fn new(port: u16) -> Self {
        ListenConfig {
            bind_address: config::default_address(),
            bind_port: port,
            response_status: config::default_status(),
            response_headers: vec![
                (
                    "Content-Type".to_string(),
                    "text/html;charset=utf-8".to_string(),
                ),
                ("Server".to_string(), config::server_ident()),
            ],
            response_body: config::default_body().into_bytes(),
            correlation_header: config::correlation_header(),
            read_timeout: Duration::from_secs(10),
        }
    }

    /// Sets a response header, replacing an existing one with the same name
    /// (case-insensitive) to keep the header list free of duplicates.
    pub fn set_response_header(&mut self, name: &str, value: &str) {
        match self
            .response_headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(header) => header.1 = value.to_string(),
            None => self
                .response_headers
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

/// The immutable record of the one request the listener served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub client_addr: String,
    pub user_agent: Option<String>,
    pub headers: HashMap<String, String>,
    pub received_at: u64,
}

#[derive(Tabled)]
pub struct HeaderTableRow {
    pub name: String,
    pub value: String,
}
