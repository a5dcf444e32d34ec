//! Device and user registration endpoints.

use serde::Serialize;
use serde_json::Value;

use pw_core::error::{PwError, PwResult};

use crate::client::PushwooshClient;

/// Parameters for registering a single device.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterDeviceParams {
    /// Application code, e.g. "AAAAA-BBBBB".
    pub application: String,
    /// Platform push token for the device.
    pub push_token: String,
    /// Hardware ID.
    pub hwid: String,
    /// Device platform: 1 iOS, 3 Android, 7 Mac, 10 Safari, 11 Chrome,
    /// 12 Firefox.
    pub device_type: i32,
    /// Optional ISO language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Optional timezone offset in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<i64>,
}

impl PushwooshClient {
    /// Register a device for push notifications.
    pub async fn register_device(&self, params: &RegisterDeviceParams) -> PwResult<Value> {
        let body = serde_json::to_value(params)?;
        self.send("registerDevice", body).await
    }

    /// Register several devices in one call. `devices` holds objects shaped
    /// like [`RegisterDeviceParams`] minus the application code. Returns a
    /// request ID usable with the job-result endpoints.
    pub async fn bulk_register_devices(
        &self,
        application: &str,
        devices: Vec<Value>,
    ) -> PwResult<Value> {
        if devices.is_empty() {
            return Err(PwError::MissingParameter(
                "bulk registration requires at least one device".into(),
            ));
        }
        let body = serde_json::json!({
            "application": application,
            "devices": devices,
        });
        self.send("bulkRegisterDevice", body).await
    }

    /// Unregister a device from push notifications.
    pub async fn unregister_device(&self, application: &str, hwid: &str) -> PwResult<Value> {
        let body = serde_json::json!({
            "application": application,
            "hwid": hwid,
        });
        self.send("unregisterDevice", body).await
    }

    /// Delete a device and all its data.
    pub async fn delete_device(&self, application: &str, hwid: &str) -> PwResult<Value> {
        let body = serde_json::json!({
            "application": application,
            "hwid": hwid,
        });
        self.send("deleteDevice", body).await
    }

    /// List devices that unsubscribed from the application.
    pub async fn get_unregistered_devices(&self, application: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "application": application });
        self.send("getUnregisteredDevices", body).await
    }

    /// Associate a user ID with a device.
    pub async fn register_user(
        &self,
        user_id: &str,
        application: &str,
        hwid: &str,
        tz_offset: Option<i64>,
        device_type: i32,
    ) -> PwResult<Value> {
        let body = serde_json::json!({
            "userId": user_id,
            "application": application,
            "hwid": hwid,
            "tz_offset": tz_offset,
            "device_type": device_type,
        });
        self.send("registerUser", body).await
    }
}
