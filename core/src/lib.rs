pub mod core;
pub mod types;

pub use crate::core::error::{DatabaseError, ShowcaseError};
pub use crate::core::{AuthError, IssuedToken, MediaError, Session, ShowcaseCore};
