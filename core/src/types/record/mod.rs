use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::SystemTime;

pub mod versioned;

/// Per-table row identifier, allocated in increasing order.
pub type RecordId = u64;

/// A record type persisted in its own redb table.
pub trait StoredRecord: Debug + Clone + Serialize + DeserializeOwned + 'static {
    const TABLE_NAME: &'static str;
    const VERSION: u8;

    fn id(&self) -> RecordId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub created_at: SystemTime,
}

impl StoredRecord for Project {
    const TABLE_NAME: &'static str = "projects";
    const VERSION: u8 = 1;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub designation: String,
    pub image_url: String,
    pub created_at: SystemTime,
}

impl StoredRecord for Client {
    const TABLE_NAME: &'static str = "clients";
    const VERSION: u8 = 1;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A visitor's contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
    pub created_at: SystemTime,
}

impl StoredRecord for Contact {
    const TABLE_NAME: &'static str = "contacts";
    const VERSION: u8 = 1;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A newsletter subscription. Emails are unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: RecordId,
    pub email: String,
    pub created_at: SystemTime,
}

impl StoredRecord for Subscriber {
    const TABLE_NAME: &'static str = "subscribers";
    const VERSION: u8 = 1;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Unvalidated fields for a new project; the image is supplied separately.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub description: String,
    pub designation: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
}
