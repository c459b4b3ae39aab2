//! Configuration management for reqtrap.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage the listener defaults: bind address, response status and body,
//! correlation header name, and the server identifier.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (highest priority, handled by the CLI layer)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Built-in defaults

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `reqtrap/.env`. This allows users to store
/// their preferred defaults without repeating flags on every invocation.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/reqtrap/.env`
/// - macOS: `~/Library/Application Support/reqtrap/.env`
/// - Windows: `%LOCALAPPDATA%/reqtrap/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is loaded or absent (a missing
/// file is not an error: every setting has a built-in default), or an error
/// string if directory creation or file parsing fails.
///
/// # Example
///
/// ```
/// use reqtrap::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("reqtrap/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Returns the default address the listener binds to.
///
/// Retrieves the `REQTRAP_BIND_ADDRESS` environment variable, falling back
/// to `0.0.0.0` (all interfaces) when it is not set.
///
/// # Example
///
/// ```
/// let address = default_address(); // e.g., "127.0.0.1"
/// ```
pub fn default_address() -> String {
    env::var("REQTRAP_BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string())
}

/// Returns the default HTTP status code for the response.
///
/// Retrieves the `REQTRAP_RESPONSE_STATUS` environment variable, falling
/// back to `200` when it is not set or cannot be parsed as a status code.
///
/// # Example
///
/// ```
/// let status = default_status(); // e.g., 204
/// ```
pub fn default_status() -> u16 {
    env::var("REQTRAP_RESPONSE_STATUS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(200)
}

/// Returns the default response body sent to the caller.
///
/// Retrieves the `REQTRAP_RESPONSE_BODY` environment variable, falling back
/// to `Success` when it is not set.
///
/// # Example
///
/// ```
/// let body = default_body(); // e.g., "<h2>You can close this window.</h2>"
/// ```
pub fn default_body() -> String {
    env::var("REQTRAP_RESPONSE_BODY").unwrap_or_else(|_| "Success".to_string())
}

/// Returns the name of the correlation header.
///
/// Retrieves the `REQTRAP_ID_HEADER` environment variable, falling back to
/// `X-Request-ID` when it is not set. The listener echoes the inbound value
/// of this header in its response, or generates a fresh id when the request
/// does not carry one.
///
/// # Example
///
/// ```
/// let header = correlation_header(); // e.g., "X-Correlation-ID"
/// ```
pub fn correlation_header() -> String {
    env::var("REQTRAP_ID_HEADER").unwrap_or_else(|_| "X-Request-ID".to_string())
}

/// Returns the value of the `Server` response header.
///
/// Retrieves the `REQTRAP_SERVER_IDENT` environment variable, falling back
/// to `<name>/<version>` of this crate when it is not set.
///
/// # Example
///
/// ```
/// let ident = server_ident(); // e.g., "reqtrap/0.1.0"
/// ```
pub fn server_ident() -> String {
    env::var("REQTRAP_SERVER_IDENT").unwrap_or_else(|_| {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    })
}
