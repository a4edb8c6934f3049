//! JSON shapes returned to the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use showcase_core::types::{Client, Contact, Project, RecordId, Subscriber};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            image_url: project.image_url,
            created_at: project.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub designation: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientView {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            description: client.description,
            designation: client.designation,
            image_url: client.image_url,
            created_at: client.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for ContactView {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            mobile: contact.mobile,
            city: contact.city,
            created_at: contact.created_at.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberView {
    pub id: RecordId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Subscriber> for SubscriberView {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            id: subscriber.id,
            email: subscriber.email,
            created_at: subscriber.created_at.into(),
        }
    }
}

pub fn list_of<R, V: From<R>>(records: Vec<R>) -> Vec<V> {
    records.into_iter().map(V::from).collect()
}
