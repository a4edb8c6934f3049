use std::fmt;

/// Where an entry's image comes from. Exactly one source per ingestion.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    Upload { bytes: Vec<u8>, original_name: String },
    Url(String),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Upload {
                bytes,
                original_name,
            } => f
                .debug_struct("Upload")
                .field("len", &bytes.len())
                .field("original_name", original_name)
                .finish(),
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// Image-bearing entity kinds. Each gets its own upload subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Project,
    Client,
}

impl MediaKind {
    /// File name prefix for stored uploads.
    pub fn prefix(self) -> &'static str {
        match self {
            MediaKind::Project => "project",
            MediaKind::Client => "client",
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Project => "projects",
            MediaKind::Client => "clients",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
