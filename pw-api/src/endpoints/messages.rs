//! Message endpoints: creation, deletion, push history, inbox, tracking log.
//!
//! Push history is paginated by an opaque "last notification ID" cursor;
//! this module provides the single-page call plus eager and lazy traversals
//! over the full history.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use pw_core::error::{PwError, PwResult};

use crate::client::PushwooshClient;
use crate::response::response_field;

/// Search criteria for push history retrieval.
///
/// All fields are optional; an empty query matches the whole history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PushHistoryQuery {
    /// Message source: "CP", "API", "GeoZone", "Beacon", "RSS", "AutoPush",
    /// "Twitter", "A/B Test".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Search field: "notificationID", "notificationCode",
    /// "applicationCode", "campaignCode".
    #[serde(rename = "searchBy", skip_serializing_if = "Option::is_none")]
    pub search_by: Option<String>,
    /// Search value interpreted according to `search_by`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PushwooshClient {
    /// Fetch one page of push history.
    ///
    /// `last_notification_id` is the pagination cursor: pass 0 for the first
    /// page, then the returned last ID for subsequent pages. Returns
    /// `(row count, last notification ID, rows)`; a last ID of 0 means the
    /// traversal is complete.
    pub async fn get_push_history(
        &self,
        query: &PushHistoryQuery,
        last_notification_id: i64,
    ) -> PwResult<(usize, i64, Vec<Value>)> {
        let mut body = serde_json::to_value(query)?;
        body.as_object_mut()
            .ok_or_else(|| PwError::Serialization("history query must serialize to an object".into()))?
            .insert("lastNotificationID".into(), last_notification_id.into());

        let envelope = self.send("getPushHistory", body).await?;
        let rows = response_field(&envelope)?
            .get("rows")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| PwError::Serialization("push history response has no rows".into()))?;

        let last = rows
            .last()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        debug!("received {} history rows, last id {last}", rows.len());
        Ok((rows.len(), last, rows))
    }

    /// Fetch the entire push history matching `query`, following the cursor
    /// until the service signals the end of data.
    pub async fn get_all_push_history(&self, query: &PushHistoryQuery) -> PwResult<Vec<Value>> {
        let mut last_notification_id = 0;
        let mut result = Vec::new();

        loop {
            let (_, last, rows) = self.get_push_history(query, last_notification_id).await?;
            result.extend(rows);

            if last == 0 {
                break;
            }
            last_notification_id = last;
        }

        Ok(result)
    }

    /// Lazily traverse the push history one row at a time.
    ///
    /// Pages are fetched on demand at page boundaries; dropping the stream
    /// early is safe since each page's transport call completes before any
    /// of its rows are yielded.
    pub fn push_history_stream(&self, query: PushHistoryQuery) -> PushHistoryStream<'_> {
        PushHistoryStream {
            client: self,
            query,
            last_notification_id: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Create a message. `notifications` is the list of notification objects
    /// exactly as documented by the service; no validation is applied here.
    ///
    /// Note this call is not idempotent: avoid retry configurations that
    /// replay it on ambiguous failures.
    pub async fn create_message(
        &self,
        application: &str,
        notifications: Vec<Value>,
    ) -> PwResult<Value> {
        let body = serde_json::json!({
            "application": application,
            "notifications": notifications,
        });
        self.send("createMessage", body).await
    }

    /// Delete a message by the code obtained from `create_message`.
    pub async fn delete_message(&self, message_code: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "message": message_code });
        self.send("deleteMessage", body).await
    }

    /// Fetch messages stored in the inbox for a user/device.
    ///
    /// `user_id` must equal `hwid` when no custom user ID is registered.
    /// `last_code` is the pagination cursor from the previous response and
    /// `count` the page size (0 for the service default). Returns the inner
    /// response object.
    pub async fn get_inbox_messages(
        &self,
        application: &str,
        user_id: &str,
        hwid: &str,
        last_code: Option<&str>,
        count: u32,
    ) -> PwResult<Value> {
        let body = serde_json::json!({
            "application": application,
            "userId": user_id,
            "hwid": hwid,
            "last_code": last_code,
            "count": count,
        });
        let envelope = self.send("getInboxMessages", body).await?;
        Ok(response_field(&envelope)?.clone())
    }

    /// Fetch the tracking log for a given day.
    pub async fn get_tracking_log(&self, date: NaiveDate) -> PwResult<Value> {
        let body = serde_json::json!({ "date": date.format("%Y-%m-%d").to_string() });
        self.send("getTrackingLog", body).await
    }
}

/// Pull-based lazy traversal over push history rows.
pub struct PushHistoryStream<'a> {
    client: &'a PushwooshClient,
    query: PushHistoryQuery,
    last_notification_id: i64,
    buffer: VecDeque<Value>,
    done: bool,
}

impl PushHistoryStream<'_> {
    /// Yield the next row, fetching the next page when the buffer is empty.
    /// Returns `None` once the cursor signals end-of-data.
    pub async fn next(&mut self) -> PwResult<Option<Value>> {
        while self.buffer.is_empty() && !self.done {
            let (_, last, rows) = self
                .client
                .get_push_history(&self.query, self.last_notification_id)
                .await?;

            if last == 0 {
                self.done = true;
            }
            self.last_notification_id = last;
            self.buffer.extend(rows);
        }

        Ok(self.buffer.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_serializes_set_fields_only() {
        let query = PushHistoryQuery {
            source: Some("API".into()),
            search_by: Some("applicationCode".into()),
            value: Some("AAAAA-BBBBB".into()),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"source": "API", "searchBy": "applicationCode", "value": "AAAAA-BBBBB"})
        );
    }

    #[test]
    fn test_empty_query_serializes_empty() {
        let query = PushHistoryQuery::default();
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({}));
    }
}
