//! Command line arguments for the `json2bq` binary.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::settings::{DEFAULT_PACKAGE_NAME, GenerateSettings};

/// Shown after the flag list in `--help`.
const SAMPLES: &str = r#"Long flags take two dashes, as in
`json2bq --schemaFile schema.json --packageName tables`.

Sample input file:

[
    {
        "type": "INTEGER",
        "name": "numbers"
    },
    {
        "type": "STRING",
        "name": "currency_code"
    }
]

Sample output:

package main

import "cloud.google.com/go/bigquery"

var Schema = bigquery.Schema{
	&bigquery.FieldSchema{
		Name: "numbers",
		Type: bigquery.IntegerFieldType,
	},
	&bigquery.FieldSchema{
		Name: "currency_code",
		Type: bigquery.StringFieldType,
	},
}"#;

/// Path that means "read the schema from standard input".
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "json2bq", version)]
#[command(about = "Convert a BigQuery JSON schema into a Go bigquery.Schema declaration")]
#[command(after_help = SAMPLES)]
pub struct Args {
    /// Path to the file with the JSON schema (`-` reads standard input)
    #[arg(long = "schemaFile", value_name = "PATH")]
    pub schema_file: Option<PathBuf>,

    /// Name of the generated Go package
    #[arg(long = "packageName", value_name = "NAME", default_value = DEFAULT_PACKAGE_NAME)]
    pub package_name: String,

    /// Write the generated source to this file instead of standard output
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Generation settings for these arguments.
    #[must_use]
    pub fn settings(&self) -> GenerateSettings {
        GenerateSettings::default().with_package_name(self.package_name.clone())
    }

    /// The schema path. Empty when the flag is missing, which fails to read.
    #[must_use]
    pub fn schema_path(&self) -> &Path {
        self.schema_file.as_deref().unwrap_or_else(|| Path::new(""))
    }

    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.schema_path() == Path::new(STDIN_PATH)
    }

    /// Default tracing filter for the requested verbosity.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
