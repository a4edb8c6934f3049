//! HTTP surface for the showcase admin backend.

mod app;
mod auth;
mod error;
mod records;
mod upload;
mod views;

pub use app::{AppState, router};
pub use auth::AdminSession;
pub use error::ApiError;
