#![allow(dead_code)]

use encosis::app::{AppState, build_router};
use encosis::store::StoreConfig;
use encosis::store::memory::InMemoryStore;
use std::sync::Arc;

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn memory_app(config: StoreConfig) -> TestApp {
    let state = AppState::new(Arc::new(InMemoryStore::new(config)));
    build_router(state).into_service()
}
