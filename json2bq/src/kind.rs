//! `BigQuery` field type and mode mapping.
//!
//! Type names and modes are matched case-insensitively. Unknown types are an
//! error; unknown modes mean "no annotation".

use std::error;
use std::fmt;

/// Annotation emitted for repeated fields.
pub const REPEATED_ANNOTATION: &str = "Repeated: true,";

/// A `BigQuery` field type the generator knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bytes,
    Boolean,
    Integer,
    Record,
    String,
    Float,
    Timestamp,
    Date,
    Time,
    DateTime,
}

/// Upper-case type name to kind. The only lookup site for type names.
const FIELD_KINDS: [(&str, FieldKind); 10] = [
    ("BYTES", FieldKind::Bytes),
    ("BOOLEAN", FieldKind::Boolean),
    ("INTEGER", FieldKind::Integer),
    ("RECORD", FieldKind::Record),
    ("STRING", FieldKind::String),
    ("FLOAT", FieldKind::Float),
    ("TIMESTAMP", FieldKind::Timestamp),
    ("DATE", FieldKind::Date),
    ("TIME", FieldKind::Time),
    ("DATETIME", FieldKind::DateTime),
];

impl FieldKind {
    /// Look up a field type name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFieldType` carrying the name as given when it is not a
    /// supported `BigQuery` type.
    pub fn from_type_name(type_name: &str) -> Result<Self, UnknownFieldType> {
        let upper: String = type_name.to_uppercase();
        FIELD_KINDS
            .iter()
            .find(|(name, _)| *name == upper)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| UnknownFieldType(type_name.to_string()))
    }

    /// The Go identifier of this kind in `cloud.google.com/go/bigquery`.
    #[must_use]
    pub const fn go_constant(self) -> &'static str {
        match self {
            Self::Bytes => "bigquery.BytesFieldType",
            Self::Boolean => "bigquery.BooleanFieldType",
            Self::Integer => "bigquery.IntegerFieldType",
            Self::Record => "bigquery.RecordFieldType",
            Self::String => "bigquery.StringFieldType",
            Self::Float => "bigquery.FloatFieldType",
            Self::Timestamp => "bigquery.TimestampFieldType",
            Self::Date => "bigquery.DateFieldType",
            Self::Time => "bigquery.TimeFieldType",
            Self::DateTime => "bigquery.DateTimeFieldType",
        }
    }
}

/// A `type` value outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl error::Error for UnknownFieldType {}

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type {}", self.0)
    }
}

/// Repetition mode of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Repeated,
    Required,
    /// Absent, empty, `NULLABLE` or unrecognized.
    Unspecified,
}

impl FieldMode {
    /// Parse an optional mode string, ignoring case. Never fails.
    #[must_use]
    pub fn parse(mode: Option<&str>) -> Self {
        match mode.map(str::to_uppercase).as_deref() {
            Some("REPEATED") => Self::Repeated,
            Some("REQUIRED") => Self::Required,
            _ => Self::Unspecified,
        }
    }

    /// The annotation line for this mode, if any.
    ///
    /// `Required` yields the repeated annotation as well; generated schemas have
    /// always treated the two the same way.
    #[must_use]
    pub const fn annotation(self) -> Option<&'static str> {
        match self {
            Self::Repeated | Self::Required => Some(REPEATED_ANNOTATION),
            Self::Unspecified => None,
        }
    }
}
