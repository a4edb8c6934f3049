pub(crate) mod config;
pub use config::{AppConfig, AppConfigError, AuthConfig, Config, OperatorCredentials, ServerConfig, StorageConfig};

pub(crate) mod text;
pub use text::{FieldText, FieldTextError, ImageUrl, ImageUrlError, MAX_FIELD_LENGTH};

pub(crate) mod image_source;
pub use image_source::{ImageSource, MediaKind};

pub(crate) mod record;
pub use record::versioned::CodecError;
pub use record::{Client, Contact, NewClient, NewContact, NewProject, Project, RecordId, Subscriber};
