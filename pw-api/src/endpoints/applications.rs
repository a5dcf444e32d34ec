//! Application listing endpoints.
//!
//! Application listing is paginated by page number; the service reports the
//! total page count with every page. Traversal ends when the current page
//! equals the total.

use std::collections::VecDeque;

use serde_json::{Map, Value};
use tracing::debug;

use pw_core::error::PwResult;

use crate::client::PushwooshClient;
use crate::response::response_field;

impl PushwooshClient {
    /// Fetch one page of the application list.
    ///
    /// Returns `(total pages, current page, applications)` where the
    /// applications map is keyed by application code.
    pub async fn get_applications(&self, page: u64) -> PwResult<(u64, u64, Map<String, Value>)> {
        let body = serde_json::json!({ "page": page });
        let envelope = self.send("getApplications", body).await?;
        let response = response_field(&envelope)?;

        let total = response.get("total").and_then(Value::as_u64).unwrap_or(0);
        let current = response.get("page").and_then(Value::as_u64).unwrap_or(0);
        let applications = response
            .get("applications")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        debug!("received {} applications on page {current}/{total}", applications.len());
        Ok((total, current, applications))
    }

    /// Fetch all applications across every page, merged into one map.
    ///
    /// Merge order follows page order, so a key appearing on several pages
    /// keeps the value from the last page that carried it.
    pub async fn get_all_applications(&self) -> PwResult<Map<String, Value>> {
        let mut page = 0;
        let mut result = Map::new();

        loop {
            let (total, current, applications) = self.get_applications(page).await?;
            result.extend(applications);

            if current == total {
                break;
            }
            page = current + 1;
        }

        Ok(result)
    }

    /// Lazily traverse all applications as `(code, application)` pairs.
    ///
    /// Pages are fetched on demand; dropping the stream early is safe.
    pub fn applications_stream(&self) -> ApplicationsStream<'_> {
        ApplicationsStream {
            client: self,
            page: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

/// Pull-based lazy traversal over the application list.
pub struct ApplicationsStream<'a> {
    client: &'a PushwooshClient,
    page: u64,
    buffer: VecDeque<(String, Value)>,
    done: bool,
}

impl ApplicationsStream<'_> {
    /// Yield the next `(code, application)` pair, fetching the next page
    /// when the buffer is empty. Returns `None` after the last page.
    pub async fn next(&mut self) -> PwResult<Option<(String, Value)>> {
        while self.buffer.is_empty() && !self.done {
            let (total, current, applications) = self.client.get_applications(self.page).await?;

            if current == total {
                self.done = true;
            } else {
                self.page = current + 1;
            }
            self.buffer.extend(applications);
        }

        Ok(self.buffer.pop_front())
    }
}
