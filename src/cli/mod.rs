//! # CLI Module
//!
//! This module provides the command-line interface layer for reqtrap. It
//! implements the user-facing commands and coordinates between the capture
//! server, configuration, persistence, and terminal output.
//!
//! ## Overview
//!
//! The CLI module is the primary interface between users and the one-shot
//! listener. It provides commands for:
//!
//! - **Capturing**: Running a single capture with the configured response
//! - **Reviewing**: Re-displaying the most recently saved capture
//!
//! ## Commands
//!
//! ### Capture
//!
//! - [`wait`] - Binds the listener, optionally opens a URL in the browser
//!   (for OAuth-style flows where visiting a validation page triggers the
//!   callback), shows a spinner while waiting, and renders the captured
//!   request once it arrives.
//!
//! ### Review
//!
//! - [`last`] - Loads the capture saved by `wait --save` and renders it
//!   again, as a table or as JSON.
//!
//! ## Architecture Design
//!
//! The CLI layer follows the application's layered approach:
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Capture Persistence)
//!     ↓
//! Server Layer (One-Shot Listener)
//!     ↓
//! Wire Layer (HTTP Reading/Writing)
//! ```
//!
//! The capture server itself is blocking by design, so [`wait`] runs it on
//! the async runtime's blocking pool and wires Ctrl-C to the server's
//! cooperative cancellation flag. Waiting ends in exactly one of three
//! ways, each reported distinctly: a capture, the timeout elapsing, or the
//! user interrupting.
//!
//! ## Output
//!
//! Results are rendered either as a human-readable summary (status macros
//! plus a header table) or as the full JSON record with `--json`, which is
//! the form intended for scripting:
//!
//! ```bash
//! reqtrap wait 8080 --json | jq -r .request_id
//! ```
//!
//! ## Error Handling Philosophy
//!
//! Fatal conditions (bind failure, timeout, cancellation) terminate with
//! exit code 1 and a message naming the condition. Persistence failures
//! after a successful capture only warn: the capture itself is the
//! deliverable and is always printed.

mod last;
mod wait;

pub use last::last;
pub use wait::wait;
