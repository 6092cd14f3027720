//! Vendor-cloud stand-ins.
//!
//! The intercepted device phones home before it starts uploading. These
//! endpoints answer in place of the vendor cloud with fixed, credential-free
//! bodies — just enough for the firmware to proceed to its data uploads.

use axum::Json;
use serde_json::{Value, json};

pub async fn login() -> Json<Value> {
    Json(json!({
        "access_token": "intercepted-session",
        "token_type": "bearer",
        "expires_in": 86400,
    }))
}

pub async fn device_settings() -> Json<Value> {
    Json(json!({
        "upload_interval_secs": 300,
        "display_unit": "celsius",
        "led_enabled": true,
    }))
}
