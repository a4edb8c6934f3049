//! Multipart form reading for image-bearing entries.

use crate::error::ApiError;
use axum::extract::Multipart;
use showcase_core::types::ImageSource;
use std::collections::HashMap;

const IMAGE_FIELD: &str = "image";

/// Text parts plus the optional binary `image` part of a create form.
#[derive(Debug, Default)]
pub struct EntryForm {
    fields: HashMap<String, String>,
    image: Option<(Vec<u8>, String)>,
}

impl EntryForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                form.image = Some((bytes.to_vec(), file_name));
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Returns the named text part, or an empty string when absent.
    pub fn take_text(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    /// Builds the image source declared by `imageSource`. Only the part that
    /// matches the declaration is consulted.
    pub fn take_image_source(&mut self) -> Result<ImageSource, ApiError> {
        match self.take_text("imageSource").as_str() {
            "url" => Ok(ImageSource::Url(self.take_text("imageUrl"))),
            "file" => {
                let (bytes, original_name) = self.image.take().unwrap_or_default();
                Ok(ImageSource::Upload {
                    bytes,
                    original_name,
                })
            }
            _ => Err(ApiError::InvalidImageSource),
        }
    }
}
