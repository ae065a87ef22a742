//! Print or write the OpenAPI document as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use marketplace::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Emit the marketplace OpenAPI document",
    version
)]
struct CliArgs {
    /// Write the document to this file instead of stdout.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;

    match args.output {
        Some(path) => write_document(&path, &document),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{document}").wrap_err("write OpenAPI document to stdout")
        }
    }
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("output path must name a file: {}", path.display()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open output directory {}", parent.display()))?;
    dir.write(file_name, document)
        .wrap_err_with(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn writes_document_into_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("openapi.json");

        write_document(&path, "{}").expect("document written");

        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "{}");
    }

    #[rstest]
    fn rejects_a_directory_path() {
        assert!(write_document(Path::new("/"), "{}").is_err());
    }
}
