//! Form-submission boundary for bulk permission updates.
//!
//! The permission editor names each checkbox `permissions.<base64(name)>`
//! because permission names contain spaces and dots that are unsafe in field
//! identifiers. Decoding a submission yields a [`GrantSet`] ready for
//! [`GrantSet::merge`].

use crate::{
    error::{Error, Result},
    grant::GrantSet,
    permission::Permission,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Prefix of every permission checkbox field.
pub const FIELD_PREFIX: &str = "permissions.";

/// Field name carrying `permission`.
pub fn field_name(permission: &str) -> String {
    format!("{FIELD_PREFIX}{}", STANDARD.encode(permission))
}

/// Decode a field name back into a permission.
///
/// Returns `Ok(None)` for fields that are not permission checkboxes.
pub fn decode_field_name(field: &str) -> Result<Option<Permission>> {
    let Some(encoded) = field.strip_prefix(FIELD_PREFIX) else {
        return Ok(None);
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::InvalidFormField(format!("'{field}' is not valid base64: {e}")))?;
    let name = String::from_utf8(bytes)
        .map_err(|_| Error::InvalidFormField(format!("'{field}' does not decode to UTF-8")))?;

    Permission::parse(&name).map(Some)
}

/// Interpret a checkbox value as sent by the permission editor.
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(Error::InvalidFormField(format!(
            "'{other}' is not a checkbox value"
        ))),
    }
}

/// Decode a whole submission into grant updates.
///
/// Fields without the permission prefix are skipped. A permission submitted
/// twice keeps its last value.
pub fn decode_submission<I, K, V>(fields: I) -> Result<GrantSet>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut updates = GrantSet::new();

    for (field, value) in fields {
        if let Some(permission) = decode_field_name(field.as_ref())? {
            updates.set(permission.into_string(), parse_flag(value.as_ref())?);
        }
    }

    Ok(updates)
}
