//! Version-tagged postcard encoding for stored records.
//!
//! Layout: one version byte followed by the postcard body. Decoding rejects
//! any version other than the record type's current one.

use super::StoredRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty record bytes")]
    Empty,

    #[error("unsupported {table} record version: {version}")]
    UnsupportedVersion { table: &'static str, version: u8 },

    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
}

pub fn encode<R: StoredRecord>(record: &R) -> Result<Vec<u8>, CodecError> {
    Ok(postcard::to_extend(record, vec![R::VERSION])?)
}

pub fn decode<R: StoredRecord>(data: &[u8]) -> Result<R, CodecError> {
    let (version, body) = data.split_first().ok_or(CodecError::Empty)?;
    if *version != R::VERSION {
        return Err(CodecError::UnsupportedVersion {
            table: R::TABLE_NAME,
            version: *version,
        });
    }
    Ok(postcard::from_bytes(body)?)
}
