//! # API Module
//!
//! This module provides the request-handling layer for the one-shot
//! listener: the interface the server loop dispatches a parsed request to,
//! and the standard implementation that answers with the configured
//! response.
//!
//! ## Overview
//!
//! The server loop owns sockets and timeouts; this module owns the logic of
//! turning a parsed request into a reply:
//!
//! - [`RequestHandler`] - The seam between the two: a single
//!   `handle(request) -> Reply` operation. The server loop is generic over
//!   it, so tests can substitute their own handler.
//! - [`CaptureHandler`] - The standard implementation, holding the
//!   configured status, headers, and body as fields and resolving the
//!   correlation id (echo the inbound header, or generate a fresh UUID).
//!
//! ## Correlation
//!
//! Every reply carries the correlation header. When the inbound request
//! already has one, its exact value is echoed back; otherwise a freshly
//! generated id is used. The resolved id travels in the [`Reply`] so the
//! server can record it in the capture.
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Calls into this layer once per parsed request
//! - [`crate::http`] - The request and response types handled here

mod capture;

pub use capture::CaptureHandler;
pub use capture::Reply;
pub use capture::RequestHandler;
