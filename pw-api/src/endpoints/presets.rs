//! Message preset endpoints.

use serde_json::Value;

use pw_core::error::PwResult;

use crate::client::PushwooshClient;

impl PushwooshClient {
    /// Create a message preset. `preset` is the full preset object as
    /// documented by the service (name, application code, content).
    pub async fn create_preset(&self, preset: Value) -> PwResult<Value> {
        let body = serde_json::json!({ "preset": preset });
        self.send("createPreset", body).await
    }

    /// Fetch a preset by its code.
    pub async fn get_preset(&self, preset_code: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "preset_code": preset_code });
        self.send("getPreset", body).await
    }

    /// List presets defined for an application.
    pub async fn list_presets(&self, application: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "application": application });
        self.send("listPresets", body).await
    }

    /// Delete a preset by its code.
    pub async fn delete_preset(&self, preset_code: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "preset_code": preset_code });
        self.send("deletePreset", body).await
    }
}
