use nutype::nutype;

pub const MAX_FIELD_LENGTH: usize = 4096;

/// A required free-text record field: trimmed, never empty.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_FIELD_LENGTH),
    derive(Debug, Clone, PartialEq, Eq, AsRef, Deref, Into, Display)
)]
pub struct FieldText(String);

/// A caller-supplied image URL. Only trimmed and checked for emptiness; the
/// target is never fetched.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, AsRef, Deref, Into, Display)
)]
pub struct ImageUrl(String);
