//! Language command implementation

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::App;
use crate::models::language::LanguageIdentifier;

#[derive(Args, Debug)]
pub struct LanguageArgs {
    /// Editor filetype (e.g. sh, tsx) or file name (e.g. main.rs)
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub input: String,
    pub language_id: LanguageIdentifier,
    pub known: bool,
    pub resolved_by: &'static str,
}

/// File names resolve by extension; bare names try filetype aliases first.
pub fn resolve(name: &str) -> LanguageResponse {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|_| name.contains('.'));

    let (language_id, resolved_by) = match extension {
        Some(ext) => (LanguageIdentifier::from_extension(ext), "extension"),
        None => {
            let by_filetype = LanguageIdentifier::from_filetype(name);
            if by_filetype.is_known() {
                (by_filetype, "filetype")
            } else {
                (LanguageIdentifier::from_extension(name), "extension")
            }
        }
    };

    LanguageResponse {
        input: name.to_string(),
        known: language_id.is_known(),
        language_id,
        resolved_by,
    }
}

pub fn execute(args: LanguageArgs, app: &App) -> Result<()> {
    app.output.print_success_flat(resolve(&args.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_name() {
        let resp = resolve("src/App.tsx");
        assert_eq!(resp.language_id, LanguageIdentifier::TYPESCRIPT_REACT);
        assert_eq!(resp.resolved_by, "extension");
        assert!(resp.known);
    }

    #[test]
    fn test_resolve_filetype() {
        let resp = resolve("sh");
        assert_eq!(resp.language_id, LanguageIdentifier::SHELL_SCRIPT);
        assert_eq!(resp.resolved_by, "filetype");
    }

    #[test]
    fn test_resolve_bare_extension() {
        let resp = resolve("rs");
        assert_eq!(resp.language_id, LanguageIdentifier::RUST);
    }

    #[test]
    fn test_resolve_unknown_passthrough() {
        let resp = resolve("zig");
        assert!(!resp.known);
        assert_eq!(resp.language_id.as_str(), "zig");
        assert_eq!(
            serde_json::to_value(&resp).unwrap()["language_id"],
            serde_json::json!("zig")
        );
    }
}
