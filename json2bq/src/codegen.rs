use crate::error::Json2BqError;
use crate::field::FieldDescriptor;
use crate::format;
use crate::kind::FieldKind;
use crate::settings::GenerateSettings;
use std::io::Write;

/// Import path of the Go `BigQuery` client.
pub const BIGQUERY_IMPORT_PATH: &str = "cloud.google.com/go/bigquery";

/// Name of the generated Go variable.
pub const SCHEMA_VAR_NAME: &str = "Schema";

/// Emit unformatted Go source declaring `fields` as a `bigquery.Schema`.
///
/// Writes the package clause, the import and the opening of the top-level
/// literal, then every field in order, then the closing brace.
///
/// # Errors
///
/// Returns `Json2BqError::UnknownTypeError` for the first field whose type is not
/// supported. Nothing is returned for the fields emitted before it.
pub fn emit_go_source(
    fields: &[FieldDescriptor],
    settings: &GenerateSettings,
) -> Result<Vec<u8>, Json2BqError> {
    let mut buf: Vec<u8> = Vec::new();
    writeln!(buf, "package {}", settings.package_name)?;
    writeln!(buf, "import \"{BIGQUERY_IMPORT_PATH}\"")?;
    writeln!(buf, "var {SCHEMA_VAR_NAME} = bigquery.Schema{{")?;
    emit_fields(fields, 0, &mut buf, settings)?;
    writeln!(buf, "}}")?;
    tracing::debug!(
        bytes = buf.len(),
        fields = fields.len(),
        "emitted raw Go source"
    );
    Ok(buf)
}

/// Emit one `&bigquery.FieldSchema{...}` block per field, recursing into records.
fn emit_fields<W: Write>(
    fields: &[FieldDescriptor],
    depth: usize,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), Json2BqError> {
    for field in fields {
        let kind: FieldKind = field
            .kind()
            .map_err(|unknown| Json2BqError::UnknownTypeError {
                field_type: unknown.0,
                source_name: settings.source_name.clone(),
            })?;
        tracing::trace!(name = %field.name, ?kind, depth, "emitting field");

        writeln!(writer, "&bigquery.FieldSchema{{")?;
        writeln!(writer, "Name: \"{}\",", field.name)?;
        writeln!(writer, "Type: {},", kind.go_constant())?;
        if let Some(annotation) = field.mode().annotation() {
            writeln!(writer, "{annotation}")?;
        }
        if kind == FieldKind::Record {
            writeln!(writer, "Schema: bigquery.Schema{{")?;
            emit_fields(field.children(), depth + 1, writer, settings)?;
            writeln!(writer, "}},")?;
        }
        writeln!(writer, "}},")?;
    }
    Ok(())
}

/// Format raw Go source produced by `emit_go_source`.
///
/// # Errors
///
/// Returns `Json2BqError::FormatError`, carrying the raw text, if it is not valid
/// UTF-8 or not syntactically valid Go.
pub fn format_go_source(raw: &[u8]) -> Result<String, Json2BqError> {
    let text: &str = std::str::from_utf8(raw).map_err(|utf8_error| Json2BqError::FormatError {
        message: utf8_error.to_string(),
        raw_source: String::from_utf8_lossy(raw).into_owned(),
    })?;
    format::format_source(text).map_err(|syntax_error| Json2BqError::FormatError {
        message: syntax_error.to_string(),
        raw_source: text.to_string(),
    })
}

/// Decode, emit and format in one pass.
///
/// # Errors
///
/// Returns the first decode, unknown-type or format error encountered.
pub fn generate(schema_json: &[u8], settings: &GenerateSettings) -> Result<String, Json2BqError> {
    let fields: Vec<FieldDescriptor> = crate::field::parse_schema(schema_json)?;
    tracing::debug!(
        fields = fields.len(),
        source = %settings.source_name,
        "decoded schema"
    );
    let raw: Vec<u8> = emit_go_source(&fields, settings)?;
    let formatted: String = format_go_source(&raw)?;
    tracing::debug!(bytes = formatted.len(), "formatted Go source");
    Ok(formatted)
}
