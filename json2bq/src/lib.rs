//! Convert `BigQuery` JSON table schemas into Go `bigquery.Schema` declarations.

pub mod cli;
mod codegen;
mod error;
mod field;
pub mod format;
mod kind;
mod settings;

pub use codegen::{
    BIGQUERY_IMPORT_PATH, SCHEMA_VAR_NAME, emit_go_source, format_go_source, generate,
};
pub use error::Json2BqError;
pub use field::{FieldDescriptor, parse_schema};
pub use kind::{FieldKind, FieldMode, REPEATED_ANNOTATION, UnknownFieldType};
pub use settings::{DEFAULT_PACKAGE_NAME, DEFAULT_SOURCE_NAME, GenerateSettings};

use std::io::Write;
use std::path::Path;

/// Generate Go source from a JSON schema and write it to `writer`.
///
/// Formatting finishes before the first byte is written, so a failed run leaves
/// `writer` untouched.
///
/// # Errors
///
/// Returns `Json2BqError` if the schema cannot be decoded, a field has an unknown
/// type, the generated source does not format, or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    schema_json: &[u8],
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), Json2BqError> {
    let source: String = generate(schema_json, settings)?;
    writer.write_all(source.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Generate Go source from a JSON schema file.
///
/// The file path replaces `settings.source_name` in diagnostics.
///
/// # Errors
///
/// Returns `Json2BqError::ReadError` if the file cannot be read, or any error
/// `generate` returns.
pub fn generate_from_file(
    input_path: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<String, Json2BqError> {
    let input_path: &Path = input_path.as_ref();
    let schema_json: Vec<u8> =
        std::fs::read(input_path).map_err(|error| Json2BqError::ReadError {
            path: input_path.to_path_buf(),
            error,
        })?;
    tracing::info!(path = %input_path.display(), bytes = schema_json.len(), "read schema file");
    let settings: GenerateSettings = settings
        .clone()
        .with_source_name(input_path.display().to_string());
    generate(&schema_json, &settings)
}
