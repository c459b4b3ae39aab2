use std::path::PathBuf;

use crate::types::CapturedRequest;

pub struct CaptureManager {
    capture: CapturedRequest,
}

impl CaptureManager {
    pub fn new(capture: CapturedRequest) -> Self {
        CaptureManager { capture }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::capture_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let capture: CapturedRequest = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { capture })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::capture_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.capture).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub fn current(&self) -> &CapturedRequest {
        &self.capture
    }

    fn capture_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("reqtrap/cache/last_capture.json");
        path
    }
}
