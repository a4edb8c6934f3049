use crate::core::credential::unix_millis;
use crate::types::{ImageSource, ImageUrl, MediaKind};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ExtendedColorType, ImageEncoder};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum MediaError {
        #[error("No image file or image URL supplied")]
        MissingImageSource,

        #[error("Image decode error: {0}")]
        ImageDecode(#[from] image::ImageError),

        #[error("Resize error: {0}")]
        Resize(#[from] fast_image_resize::ResizeError),

        #[error("Storage error: {0}")]
        Storage(#[from] std::io::Error),
    }
}

use error::MediaError;

/// Writes uploaded images and their normalized derivatives under
/// `uploads_path/{projects|clients}/`.
pub struct MediaStore {
    pub uploads_path: PathBuf,
}

impl MediaStore {
    pub const TARGET_WIDTH: u32 = 450;
    pub const TARGET_HEIGHT: u32 = 350;
    pub const JPEG_QUALITY: u8 = 85;
    /// URL prefix under which `uploads_path` is served.
    pub const PUBLIC_PREFIX: &'static str = "/uploads";
    const DERIVATIVE_SUFFIX: &'static str = "cropped.jpg";

    pub fn kind_dir(&self, kind: MediaKind) -> PathBuf {
        self.uploads_path.join(kind.dir_name())
    }

    pub fn public_path(kind: MediaKind, file_name: &str) -> String {
        format!("{}/{}/{}", Self::PUBLIC_PREFIX, kind.dir_name(), file_name)
    }

    /// Resolves an image source to the reference stored on the owning record.
    ///
    /// URL sources are trimmed and returned as-is with no filesystem access.
    /// Uploads are decoded before anything is written, so undecodable bytes
    /// leave the upload directory untouched.
    pub fn ingest(
        &self,
        source: ImageSource,
        kind: MediaKind,
        now: SystemTime,
    ) -> Result<String, MediaError> {
        match source {
            ImageSource::Url(url) => ImageUrl::try_new(url)
                .map(ImageUrl::into_inner)
                .map_err(|_| MediaError::MissingImageSource),
            ImageSource::Upload {
                bytes,
                original_name,
            } => {
                if bytes.is_empty() {
                    return Err(MediaError::MissingImageSource);
                }
                self.store_upload(&bytes, &original_name, kind, now)
            }
        }
    }

    fn store_upload(
        &self,
        bytes: &[u8],
        original_name: &str,
        kind: MediaKind,
        now: SystemTime,
    ) -> Result<String, MediaError> {
        let source_image = image::load_from_memory(bytes)?;
        let derivative = cover_fit(&source_image)?;

        let dir = self.kind_dir(kind);
        std::fs::create_dir_all(&dir)?;

        let (timestamp, derivative_path, derivative_file) =
            reserve_derivative(&dir, kind.prefix(), unix_millis(now))?;
        let derivative_name = derivative_file_name(kind.prefix(), timestamp);

        let mut raw_name = format!(
            "{}-{}-{}",
            kind.prefix(),
            timestamp,
            sanitize_file_name(original_name)
        );
        // An upload literally named `cropped.jpg` must not clobber its own derivative.
        if raw_name.eq_ignore_ascii_case(&derivative_name) {
            raw_name = format!("{}-{}-raw-{}", kind.prefix(), timestamp, Self::DERIVATIVE_SUFFIX);
        }
        let raw_path = dir.join(&raw_name);

        if let Err(err) = std::fs::write(&raw_path, bytes) {
            discard(&derivative_path);
            return Err(err.into());
        }

        if let Err(err) = write_jpeg(derivative_file, &derivative) {
            discard(&derivative_path);
            tracing::warn!(
                raw = %raw_path.display(),
                error = %err,
                "derivative write failed; raw upload left orphaned"
            );
            return Err(err);
        }

        tracing::info!(
            %kind,
            raw = %raw_path.display(),
            derivative = %derivative_path.display(),
            "upload normalized"
        );
        Ok(Self::public_path(kind, &derivative_name))
    }
}

fn derivative_file_name(prefix: &str, timestamp: u64) -> String {
    format!("{prefix}-{timestamp}-{}", MediaStore::DERIVATIVE_SUFFIX)
}

/// Claims a derivative file name with create-new semantics, moving to the
/// next millisecond on collision. Returns the claimed timestamp.
fn reserve_derivative(
    dir: &Path,
    prefix: &str,
    mut timestamp: u64,
) -> io::Result<(u64, PathBuf, File)> {
    loop {
        let path = dir.join(derivative_file_name(prefix, timestamp));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((timestamp, path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => timestamp += 1,
            Err(err) => return Err(err),
        }
    }
}

fn discard(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %err, "failed to discard derivative");
    }
}

/// Longest stem kept from an uploaded file name, in bytes.
const MAX_STEM_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;

/// Keeps only the final path component, collapses each whitespace run into a
/// single `-` and caps the stem at [`MAX_STEM_BYTES`], keeping the extension.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut sanitized = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('-');
            }
            in_whitespace = true;
        } else {
            sanitized.push(ch);
            in_whitespace = false;
        }
    }

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        "upload".to_string()
    } else {
        truncate_stem(sanitized)
    }
}

fn truncate_stem(name: String) -> String {
    if name.len() <= MAX_STEM_BYTES {
        return name;
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES + 1 => name.split_at(dot),
        _ => (name.as_str(), ""),
    };

    let mut end = MAX_STEM_BYTES.min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{extension}", &stem[..end])
}

/// Center-anchored cover fit: crops the source to the target aspect ratio
/// around its center, then scales to exactly the target size.
fn cover_fit(source: &DynamicImage) -> Result<DynamicImage, MediaError> {
    let source = DynamicImage::ImageRgb8(source.to_rgb8());
    let mut target = DynamicImage::new(
        MediaStore::TARGET_WIDTH,
        MediaStore::TARGET_HEIGHT,
        ColorType::Rgb8,
    );

    let mut resizer = Resizer::new();
    resizer.resize(
        &source,
        &mut target,
        Some(
            &ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
                .fit_into_destination(Some((0.5, 0.5))),
        ),
    )?;

    Ok(target)
}

fn write_jpeg(file: File, image: &DynamicImage) -> Result<(), MediaError> {
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, MediaStore::JPEG_QUALITY)
        .write_image(
            image.as_bytes(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| match err {
            image::ImageError::IoError(io) => MediaError::Storage(io),
            other => MediaError::ImageDecode(other),
        })?;
    writer.flush()?;
    Ok(())
}
