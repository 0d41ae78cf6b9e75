//! Binary to generate a Go `bigquery.Schema` from a `BigQuery` JSON schema.
//!
//! Usage: `json2bq --schemaFile schema.json [--packageName NAME] > schema.go`

use std::io::{Read, Write, stdin, stdout};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use json2bq::cli::Args;
use json2bq::{Json2BqError, generate, generate_from_file};

fn main() -> ExitCode {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_filter().into()),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Json2BqError> {
    let settings = args.settings();
    let source: String = if args.reads_stdin() {
        let mut schema_json: Vec<u8> = Vec::new();
        stdin()
            .read_to_end(&mut schema_json)
            .map_err(|error| Json2BqError::ReadError {
                path: args.schema_path().to_path_buf(),
                error,
            })?;
        generate(&schema_json, &settings.with_source_name("<stdin>"))?
    } else {
        generate_from_file(args.schema_path(), &settings)?
    };

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, source.as_bytes()).map_err(|error| {
            Json2BqError::WriteError {
                path: output_path.clone(),
                error,
            }
        })?;
        tracing::info!(path = %output_path.display(), "wrote generated source");
    } else {
        let mut stdout = stdout().lock();
        stdout.write_all(source.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}
