use serde::Deserialize;

use crate::error::Json2BqError;
use crate::kind::{FieldKind, FieldMode, UnknownFieldType};

/// One column of a `BigQuery` JSON schema.
///
/// Only the keys used by the generator are modeled. Extra keys such as
/// `description` are ignored via serde's default behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    pub r#type: String,

    pub name: String,

    #[serde(default)]
    pub mode: Option<String>,

    /// Nested columns; only meaningful for `RECORD` fields.
    #[serde(default)]
    pub fields: Option<Vec<FieldDescriptor>>,
}

impl FieldDescriptor {
    /// Resolve `type` to a known field kind.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFieldType` when `type` is not a supported `BigQuery` type.
    pub fn kind(&self) -> Result<FieldKind, UnknownFieldType> {
        FieldKind::from_type_name(&self.r#type)
    }

    #[must_use]
    pub fn mode(&self) -> FieldMode {
        FieldMode::parse(self.mode.as_deref())
    }

    /// Child fields in declaration order. Empty when absent or `null`.
    #[must_use]
    pub fn children(&self) -> &[FieldDescriptor] {
        self.fields.as_deref().unwrap_or_default()
    }
}

/// Decode a JSON array of field descriptors.
///
/// # Errors
///
/// Returns `Json2BqError::DecodeError` if the bytes are not valid JSON or not an
/// array of field objects.
pub fn parse_schema(data: &[u8]) -> Result<Vec<FieldDescriptor>, Json2BqError> {
    let fields: Vec<FieldDescriptor> = serde_json::from_slice(data)?;
    Ok(fields)
}
