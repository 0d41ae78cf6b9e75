//! Settings for Go schema generation.

/// Package name used when none is given.
pub const DEFAULT_PACKAGE_NAME: &str = "main";

/// Diagnostic label used when the schema did not come from a named file.
pub const DEFAULT_SOURCE_NAME: &str = "<input>";

/// Settings that control code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    /// Name in the generated `package` clause.
    pub package_name: String,

    /// Where the schema came from, named in unknown-type diagnostics.
    pub source_name: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
        }
    }
}

impl GenerateSettings {
    #[must_use]
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    #[must_use]
    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }
}
