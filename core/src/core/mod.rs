//! Core implementation combining the record database, media storage and the
//! operator credential issuer.

use crate::core::credential::CredentialIssuer;
use crate::core::db::Database;
use crate::core::media::MediaStore;
use crate::types::{
    Client, Config, Contact, FieldText, ImageSource, MediaKind, NewClient, NewContact, NewProject,
    Project, RecordId, Subscriber,
};
use error::ShowcaseError;
use std::path::Path;
use std::time::SystemTime;

pub mod credential;
pub(crate) mod db;
pub mod media;

pub use credential::error::AuthError;
pub use credential::{IssuedToken, Session};
pub use media::error::MediaError;

pub mod error {
    pub use super::db::error::DatabaseError;
    use super::media::error::MediaError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ShowcaseError {
        #[error("Database error: {0}")]
        Database(#[from] DatabaseError),

        #[error("Media error: {0}")]
        Media(#[from] MediaError),

        #[error("Missing required field: {0}")]
        MissingField(&'static str),
    }
}

fn required(field: &'static str, value: String) -> Result<FieldText, ShowcaseError> {
    FieldText::try_new(value).map_err(|_| ShowcaseError::MissingField(field))
}

pub struct ShowcaseCore {
    db: Database,
    media: MediaStore,
    issuer: CredentialIssuer,
}

impl ShowcaseCore {
    pub fn open(config: Config) -> Result<Self, ShowcaseError> {
        let db = Database::new(&config)?;
        let media = MediaStore {
            uploads_path: config.uploads_path(),
        };
        let issuer = CredentialIssuer::new(config.operator, config.token_ttl);

        tracing::info!(
            db = %config.base_path.display(),
            uploads = %media.uploads_path.display(),
            "showcase core opened"
        );
        Ok(Self { db, media, issuer })
    }

    pub fn issuer(&self) -> &CredentialIssuer {
        &self.issuer
    }

    /// Directory the `/uploads` URL prefix maps onto.
    pub fn uploads_path(&self) -> &Path {
        &self.media.uploads_path
    }
}

/// Project operations.
impl ShowcaseCore {
    pub fn projects(&self) -> Result<Vec<Project>, ShowcaseError> {
        Ok(self.db.list()?)
    }

    /// Validates fields, ingests the image, then stores the project. Nothing is
    /// stored if ingestion fails.
    pub fn create_project(
        &self,
        fields: NewProject,
        image: ImageSource,
        now: SystemTime,
    ) -> Result<Project, ShowcaseError> {
        let name = required("name", fields.name)?;
        let description = required("description", fields.description)?;

        let image_url = self.media.ingest(image, MediaKind::Project, now)?;

        let project = self.db.create(|id| Project {
            id,
            name: name.into_inner(),
            description: description.into_inner(),
            image_url,
            created_at: now,
        })?;
        tracing::info!(id = project.id, "project created");
        Ok(project)
    }

    pub fn delete_project(&self, id: RecordId) -> Result<(), ShowcaseError> {
        self.db.delete::<Project>(id)?;
        tracing::info!(id, "project deleted");
        Ok(())
    }
}

/// Client operations.
impl ShowcaseCore {
    pub fn clients(&self) -> Result<Vec<Client>, ShowcaseError> {
        Ok(self.db.list()?)
    }

    /// Same contract as [`Self::create_project`].
    pub fn create_client(
        &self,
        fields: NewClient,
        image: ImageSource,
        now: SystemTime,
    ) -> Result<Client, ShowcaseError> {
        let name = required("name", fields.name)?;
        let description = required("description", fields.description)?;
        let designation = required("designation", fields.designation)?;

        let image_url = self.media.ingest(image, MediaKind::Client, now)?;

        let client = self.db.create(|id| Client {
            id,
            name: name.into_inner(),
            description: description.into_inner(),
            designation: designation.into_inner(),
            image_url,
            created_at: now,
        })?;
        tracing::info!(id = client.id, "client created");
        Ok(client)
    }

    pub fn delete_client(&self, id: RecordId) -> Result<(), ShowcaseError> {
        self.db.delete::<Client>(id)?;
        tracing::info!(id, "client deleted");
        Ok(())
    }
}

/// Contact submission operations.
impl ShowcaseCore {
    pub fn contacts(&self) -> Result<Vec<Contact>, ShowcaseError> {
        Ok(self.db.list()?)
    }

    pub fn create_contact(
        &self,
        fields: NewContact,
        now: SystemTime,
    ) -> Result<Contact, ShowcaseError> {
        let name = required("name", fields.name)?;
        let email = required("email", fields.email)?;
        let mobile = required("mobile", fields.mobile)?;
        let city = required("city", fields.city)?;

        Ok(self.db.create(|id| Contact {
            id,
            name: name.into_inner(),
            email: email.into_inner(),
            mobile: mobile.into_inner(),
            city: city.into_inner(),
            created_at: now,
        })?)
    }

    pub fn delete_contact(&self, id: RecordId) -> Result<(), ShowcaseError> {
        self.db.delete::<Contact>(id)?;
        Ok(())
    }
}

/// Subscriber operations.
impl ShowcaseCore {
    pub fn subscribers(&self) -> Result<Vec<Subscriber>, ShowcaseError> {
        Ok(self.db.list()?)
    }

    /// Returns `Err(Database(AlreadySubscribed))` for a duplicate email.
    pub fn create_subscriber(
        &self,
        email: String,
        now: SystemTime,
    ) -> Result<Subscriber, ShowcaseError> {
        let email = required("email", email)?;
        Ok(self.db.create_subscriber(&email, now)?)
    }

    pub fn delete_subscriber(&self, id: RecordId) -> Result<(), ShowcaseError> {
        self.db.delete_subscriber(id)?;
        Ok(())
    }
}
