use crate::{error, management::CaptureManager, success};

use super::wait::print_capture;

/// Re-displays the capture saved by `reqtrap wait --save`.
pub async fn last(json: bool) {
    match CaptureManager::load().await {
        Ok(manager) => {
            let capture = manager.current();
            success!(
                "Last capture: {} {} from {}",
                capture.method,
                capture.path,
                capture.client_addr
            );
            print_capture(capture, json);
        }
        Err(e) => error!("No saved capture found. Run reqtrap wait --save first.\n Error: {}", e),
    }
}
