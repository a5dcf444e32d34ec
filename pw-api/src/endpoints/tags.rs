//! Tag definition and tag value endpoints.

use serde::Serialize;
use serde_json::Value;

use pw_core::error::{PwError, PwResult};

use crate::client::PushwooshClient;

/// Value type of a tag, as defined by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i32")]
#[repr(i32)]
pub enum TagType {
    Integer = 1,
    String = 2,
    List = 3,
    Date = 4,
    Boolean = 5,
    /// Decimal, e.g. 19.95.
    Decimal = 6,
    /// Version string, e.g. "1.0.0.0".
    Version = 7,
}

impl From<TagType> for i32 {
    fn from(t: TagType) -> i32 {
        t as i32
    }
}

impl PushwooshClient {
    /// Define a new tag.
    pub async fn add_tag(
        &self,
        name: &str,
        tag_type: TagType,
        application_specific: bool,
        user_specific: bool,
    ) -> PwResult<Value> {
        let body = serde_json::json!({
            "tag": {
                "name": name,
                "type": tag_type,
                "application_specific": application_specific,
                "user_specific": user_specific,
            }
        });
        self.send("addTag", body).await
    }

    /// List all tag definitions for the account.
    pub async fn list_tags(&self) -> PwResult<Value> {
        self.send("listTags", serde_json::json!({})).await
    }

    /// Delete a tag definition.
    pub async fn delete_tag(&self, name: &str) -> PwResult<Value> {
        let body = serde_json::json!({
            "tag": { "name": name }
        });
        self.send("deleteTag", body).await
    }

    /// Set tag values for a device or a user.
    ///
    /// At least one of `hwid` or `user_id` must be given; otherwise the call
    /// fails locally without touching the network.
    pub async fn set_tags(
        &self,
        application: &str,
        tags: Value,
        hwid: Option<&str>,
        user_id: Option<&str>,
    ) -> PwResult<Value> {
        if hwid.is_none() && user_id.is_none() {
            return Err(PwError::MissingParameter(
                "set_tags requires a hwid or a user id".into(),
            ));
        }

        let mut body = serde_json::json!({
            "application": application,
            "tags": tags,
        });
        let fields = body
            .as_object_mut()
            .ok_or_else(|| PwError::Serialization("tag body must be an object".into()))?;
        if let Some(hwid) = hwid {
            fields.insert("hwid".into(), hwid.into());
        }
        if let Some(user_id) = user_id {
            fields.insert("userId".into(), user_id.into());
        }

        self.send("setTags", body).await
    }

    /// Set tag values for many devices at once. `devices` holds objects of
    /// the form `{"hwid": ..., "tags": {...}}`. Returns a request ID usable
    /// with the job-result endpoints.
    pub async fn bulk_set_tags(&self, application: &str, devices: Vec<Value>) -> PwResult<Value> {
        if devices.is_empty() {
            return Err(PwError::MissingParameter(
                "bulk tag setting requires at least one device".into(),
            ));
        }
        let body = serde_json::json!({
            "application": application,
            "devices": devices,
        });
        self.send("bulkSetTags", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::config::ClientConfig;

    fn offline_client() -> PushwooshClient {
        PushwooshClient::new(&ClientConfig::new("http://localhost:9", None)).unwrap()
    }

    #[test]
    fn test_tag_type_codes() {
        assert_eq!(i32::from(TagType::Integer), 1);
        assert_eq!(i32::from(TagType::Version), 7);
        assert_eq!(serde_json::to_value(TagType::Decimal).unwrap(), 6);
    }

    #[tokio::test]
    async fn test_set_tags_requires_device_or_user() {
        let client = offline_client();
        let result = client
            .set_tags("AAAAA-BBBBB", serde_json::json!({}), None, None)
            .await;
        assert!(matches!(result, Err(PwError::MissingParameter(_))));
        // No transport call was made: nothing was recorded.
        assert!(client.last_exchange().await.is_none());
    }

    #[tokio::test]
    async fn test_bulk_set_tags_rejects_empty_list() {
        let client = offline_client();
        let result = client.bulk_set_tags("AAAAA-BBBBB", vec![]).await;
        assert!(matches!(result, Err(PwError::MissingParameter(_))));
    }
}
