//! Filter and segment endpoints.

use serde::Serialize;
use serde_json::Value;

use pw_core::error::PwResult;

use crate::client::PushwooshClient;

/// Parameters for creating a filter.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFilterParams {
    /// Filter name.
    pub name: String,
    /// Filter conditions, in the service's condition-list format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
    /// Operator joining the conditions: "AND" or "OR".
    pub operator: String,
    /// Optional application code to scope the filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    /// Optional expiration date, "YYYY-MM-DD".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl CreateFilterParams {
    /// A filter with the given name, joined with "AND", and no scoping.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: None,
            operator: "AND".into(),
            application: None,
            expiration_date: None,
        }
    }
}

impl PushwooshClient {
    /// Create a named filter.
    pub async fn create_filter(&self, params: &CreateFilterParams) -> PwResult<Value> {
        let body = serde_json::to_value(params)?;
        self.send("createFilter", body).await
    }

    /// List all filters defined for the account.
    pub async fn list_filters(&self) -> PwResult<Value> {
        self.send("listFilters", serde_json::json!({})).await
    }

    /// Delete a filter by name.
    pub async fn delete_filter(&self, name: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "name": name });
        self.send("deleteFilter", body).await
    }

    /// Schedule a segment export for the devices matching `devices_filter`.
    ///
    /// The export runs asynchronously; the returned envelope carries a
    /// request ID to poll with [`PushwooshClient::wait_for_result`], after
    /// which the result holds a link to the exported CSV.
    pub async fn export_segment(&self, devices_filter: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "devices_filter": devices_filter });
        self.send("exportSegment", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_filter_defaults() {
        let params = CreateFilterParams::new("beta-testers");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"name": "beta-testers", "operator": "AND"})
        );
    }

    #[test]
    fn test_create_filter_full_shape() {
        let mut params = CreateFilterParams::new("expiring");
        params.application = Some("AAAAA-BBBBB".into());
        params.expiration_date = Some("2026-12-31".into());
        params.conditions = Some(json!([["Language", "EQ", "de"]]));
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["application"], "AAAAA-BBBBB");
        assert_eq!(value["conditions"], json!([["Language", "EQ", "de"]]));
    }
}
