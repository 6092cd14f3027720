pub mod error;
pub mod ingest;
pub mod models;
pub mod readings;
pub mod stubs;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::store::ReadingStore;

pub fn router<S>() -> Router<AppState<S>>
where
    S: ReadingStore + Clone,
{
    Router::new()
        // Intercepted device traffic
        .route("/v1/devices/data", post(ingest::upload_data))
        // Decoded readings
        .route("/v1/air-data/latest", get(readings::latest))
        .route("/v1/air-data/{scope}", get(readings::history))
        .route("/v1/status", get(readings::status))
        // Vendor-cloud stand-ins the device phones before uploading
        .route("/v1/users/login", post(stubs::login))
        .route("/v1/devices/settings", get(stubs::device_settings))
}
