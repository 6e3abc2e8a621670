use std::fs;
use std::io::Read;
use std::path::Path;

use crate::state::{default_source_path, resolve_receipts_home};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
    DefaultFile,
    Missing,
}

impl SourceKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
            Self::DefaultFile => "default_file",
            Self::Missing => "none",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

/// Picks the receipt source: an explicit path, `-` for stdin, or the default
/// `receipts.json` under the receipts home.
///
/// A missing default file is not an error; it resolves to no data.
pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
    home_override: Option<&Path>,
) -> ClientResult<ResolvedSource> {
    if let Some(path_value) = path {
        return resolve_explicit(path_value, stdin_override);
    }

    let home = resolve_receipts_home(home_override)?;
    let default_path = default_source_path(&home);
    let location = default_path.display().to_string();
    if !default_path.exists() {
        tracing::info!(source = %location, "no receipts file found; treating as no data");
        return Ok(ResolvedSource {
            source_kind: SourceKind::Missing,
            source_ref: Some(location),
            content: String::new(),
        });
    }

    let content = fs::read_to_string(&default_path)
        .map_err(|error| ClientError::source_unreadable(&location, &error.to_string()))?;
    Ok(ResolvedSource {
        source_kind: SourceKind::DefaultFile,
        source_ref: Some(location),
        content,
    })
}

/// Reads a path the caller named, with `-` meaning stdin.
pub(crate) fn resolve_explicit(
    path_value: String,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    if path_value == "-" {
        let content = read_stdin(stdin_override)?;
        return Ok(ResolvedSource {
            source_kind: SourceKind::Stdin,
            source_ref: None,
            content,
        });
    }

    let content = fs::read_to_string(&path_value)
        .map_err(|error| ClientError::source_unreadable(&path_value, &error.to_string()))?;
    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        source_ref: Some(path_value),
        content,
    })
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<String> {
    if let Some(value) = stdin_override {
        return Ok(value);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::source_unreadable("stdin", &error.to_string()))?;
    Ok(buffer)
}
