//! Write the OpenAPI document for the ClickBeard API to stdout.

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use clickbeard::doc::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the ClickBeard OpenAPI document", version)]
struct CliArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: Format,
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let rendered = match args.format {
        Format::Json => doc.to_pretty_json().map_err(io::Error::other)?,
        Format::Yaml => doc.to_yaml().map_err(io::Error::other)?,
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")
}
