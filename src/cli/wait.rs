use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    management::CaptureManager,
    server::{self, CaptureError},
    success,
    types::{CapturedRequest, HeaderTableRow, ListenConfig},
    utils, warning,
};

/// Runs one capture: binds the listener, waits for a single HTTP request,
/// and renders what arrived.
///
/// This function orchestrates the whole flow:
/// 1. Wiring Ctrl-C to the server's cancellation flag
/// 2. Starting a spinner naming the endpoint being watched
/// 3. Optionally opening a URL in the default browser (the page whose
///    redirect the listener is waiting for)
/// 4. Running the blocking capture server on the runtime's blocking pool
/// 5. Rendering the captured request, and persisting it when requested
///
/// # Arguments
///
/// * `config` - Listener configuration (address, port, response)
/// * `timeout` - How long to wait for a request before giving up
/// * `open` - URL to open in the default browser once the listener is up
/// * `json` - Render the full capture as JSON instead of a summary
/// * `save` - Persist the capture so `reqtrap last` can re-display it
///
/// # Termination
///
/// Exits with code 1 on bind failure, timeout, or cancellation, each with
/// its own message. Browser-launch and persistence failures only warn.
pub async fn wait(
    config: ListenConfig,
    timeout: Duration,
    open: Option<String>,
    json: bool,
    save: bool,
) {
    let endpoint = config.endpoint();

    let cancel = Arc::new(AtomicBool::new(false));
    let interrupt = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.store(true, Ordering::Relaxed);
        }
    });

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Waiting for a request on {}...", endpoint));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    if let Some(url) = open {
        if webbrowser::open(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            )
        }
    }

    let worker_cancel = Arc::clone(&cancel);
    let result =
        tokio::task::spawn_blocking(move || server::capture_request(config, timeout, worker_cancel))
            .await;

    pb.finish_and_clear();

    let capture = match result {
        Ok(Ok(capture)) => capture,
        Ok(Err(CaptureError::Timeout(_))) => {
            error!("No request received within {}s.", timeout.as_secs())
        }
        Ok(Err(CaptureError::Cancelled)) => error!("Capture cancelled before a request arrived."),
        Ok(Err(e)) => error!("{}", e),
        Err(e) => error!("Capture task failed: {}", e),
    };

    success!(
        "Received {} {} from {}",
        capture.method,
        capture.path,
        capture.client_addr
    );

    if save {
        let manager = CaptureManager::new(capture.clone());
        if let Err(e) = manager.persist().await {
            warning!("Failed to save capture: {}", e);
        }
    }

    print_capture(&capture, json);
}

pub(crate) fn print_capture(capture: &CapturedRequest, json: bool) {
    if json {
        match serde_json::to_string_pretty(capture) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Failed to serialize capture: {}", e),
        }
        return;
    }

    info!("Request ID: {}", capture.request_id);
    if let Some(user_agent) = &capture.user_agent {
        info!("User-Agent: {}", user_agent);
    }

    let mut rows: Vec<HeaderTableRow> = capture
        .headers
        .iter()
        .map(|(name, value)| HeaderTableRow {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();
    utils::sort_header_rows(&mut rows);

    let table = Table::new(rows);
    println!("{}", table);
}
