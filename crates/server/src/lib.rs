//! HTTP front end for the statement renderer.
//!
//! `GET /` answers with a usage hint and `POST /` turns the JSON body into a statement PDF.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/", get(api::usage).post(api::generate_statement))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .with_state(state)
}
