//! # HTTP Module
//!
//! A minimal HTTP/1.x wire layer for the one-shot listener: just enough to
//! read a single request from a socket and write a single response back.
//!
//! ## Overview
//!
//! The listener never routes, never pipelines, and never keeps a connection
//! alive, so this module stays deliberately small:
//!
//! - [`Request`] and [`read_request`] - Bounded reading and parsing of the
//!   request line and headers from any [`std::io::BufRead`]. The request
//!   line is capped at [`MAX_LINE_LENGTH`] bytes; requests over the cap are
//!   reported as [`ParseError::LineTooLong`] so the caller can answer with
//!   `414 URI Too Long` instead of the handler response.
//! - [`Response`] - An ordered status/headers/body triple serialized as an
//!   HTTP/1.1 response, with canned constructors for the two error replies
//!   the listener sends on its own authority (414 and 400).
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Drives this layer against real sockets
//! - [`crate::api`] - Builds the configured response for a parsed request

mod request;
mod response;

pub use request::MAX_LINE_LENGTH;
pub use request::ParseError;
pub use request::Request;
pub use request::read_request;
pub use response::Response;
pub use response::reason_phrase;
