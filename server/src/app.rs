use crate::error::ApiError;
use crate::{auth, records};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use showcase_core::{ShowcaseCore, ShowcaseError};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    core: Arc<ShowcaseCore>,
}

impl AppState {
    pub fn new(core: ShowcaseCore) -> Self {
        Self {
            core: Arc::new(core),
        }
    }

    pub fn core(&self) -> &ShowcaseCore {
        &self.core
    }

    /// Runs a core operation on the blocking pool; redb and image work are
    /// synchronous.
    pub(crate) async fn blocking<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ShowcaseCore) -> Result<T, ShowcaseError> + Send + 'static,
    {
        let core = Arc::clone(&self.core);
        Ok(tokio::task::spawn_blocking(move || op(&core)).await??)
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.core().uploads_path());

    Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/validate", post(auth::validate))
        .route(
            "/api/projects",
            get(records::list_projects).post(records::create_project),
        )
        .route("/api/projects/{id}", delete(records::delete_project))
        .route(
            "/api/clients",
            get(records::list_clients).post(records::create_client),
        )
        .route("/api/clients/{id}", delete(records::delete_client))
        .route(
            "/api/contact",
            get(records::list_contacts).post(records::create_contact),
        )
        .route("/api/contact/{id}", delete(records::delete_contact))
        .route(
            "/api/subscribers",
            get(records::list_subscribers).post(records::create_subscriber),
        )
        .route("/api/subscribers/{id}", delete(records::delete_subscriber))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
