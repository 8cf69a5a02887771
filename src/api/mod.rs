//! HTTP boundary: `POST /api/predict`, `GET /api/health`.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{health, predict};

use crate::detector::Detector;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<Detector>,
}

impl AppState {
    pub fn new(detector: Detector) -> Self {
        Self {
            detector: Arc::new(detector),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/health", get(health))
        .with_state(state)
}
