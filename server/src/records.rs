use crate::app::AppState;
use crate::auth::AdminSession;
use crate::error::ApiError;
use crate::upload::EntryForm;
use crate::views::{ClientView, ContactView, ProjectView, SubscriberView, list_of};
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use showcase_core::types::{NewClient, NewContact, NewProject, RecordId};
use std::time::SystemTime;

type Created<T> = (StatusCode, Json<T>);

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let projects = state.blocking(|core| core.projects()).await?;
    Ok(Json(list_of(projects)))
}

pub async fn create_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Created<ProjectView>, ApiError> {
    let mut form = EntryForm::read(multipart).await?;
    let fields = NewProject {
        name: form.take_text("name"),
        description: form.take_text("description"),
    };
    let image = form.take_image_source()?;

    let project = state
        .blocking(move |core| core.create_project(fields, image, SystemTime::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

pub async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.blocking(move |core| core.delete_project(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<ClientView>>, ApiError> {
    let clients = state.blocking(|core| core.clients()).await?;
    Ok(Json(list_of(clients)))
}

pub async fn create_client(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Created<ClientView>, ApiError> {
    let mut form = EntryForm::read(multipart).await?;
    let fields = NewClient {
        name: form.take_text("name"),
        description: form.take_text("description"),
        designation: form.take_text("designation"),
    };
    let image = form.take_image_source()?;

    let client = state
        .blocking(move |core| core.create_client(fields, image, SystemTime::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

pub async fn delete_client(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.blocking(move |core| core.delete_client(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_contacts(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<ContactView>>, ApiError> {
    let contacts = state.blocking(|core| core.contacts()).await?;
    Ok(Json(list_of(contacts)))
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    mobile: String,
    #[serde(default)]
    city: String,
}

pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Created<ContactView>, ApiError> {
    let fields = NewContact {
        name: request.name,
        email: request.email,
        mobile: request.mobile,
        city: request.city,
    };

    let contact = state
        .blocking(move |core| core.create_contact(fields, SystemTime::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.blocking(move |core| core.delete_contact(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_subscribers(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<SubscriberView>>, ApiError> {
    let subscribers = state.blocking(|core| core.subscribers()).await?;
    Ok(Json(list_of(subscribers)))
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    email: String,
}

pub async fn create_subscriber(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Created<SubscriberView>, ApiError> {
    let subscriber = state
        .blocking(move |core| core.create_subscriber(request.email, SystemTime::now()))
        .await?;
    Ok((StatusCode::CREATED, Json(subscriber.into())))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.blocking(move |core| core.delete_subscriber(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
