//! Campaign endpoints.

use serde_json::Value;

use pw_core::error::PwResult;

use crate::client::PushwooshClient;

impl PushwooshClient {
    /// Create a campaign within an application. Returns the envelope whose
    /// response carries the new campaign code.
    pub async fn create_campaign(
        &self,
        application: &str,
        name: &str,
        description: Option<&str>,
    ) -> PwResult<Value> {
        let body = serde_json::json!({
            "application": application,
            "name": name,
            "description": description,
        });
        self.send("createCampaign", body).await
    }

    /// List campaigns defined for an application.
    pub async fn get_campaigns(&self, application: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "application": application });
        self.send("getCampaigns", body).await
    }

    /// Delete a campaign by its code.
    pub async fn delete_campaign(&self, campaign: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "campaign": campaign });
        self.send("deleteCampaign", body).await
    }
}
