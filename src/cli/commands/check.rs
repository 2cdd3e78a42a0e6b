//! Check command implementation

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::app::App;
use crate::codec;
use crate::error::WireError;
use crate::protocol::{self, MessageKind};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// LSP method name (e.g. textDocument/publishDiagnostics)
    pub method: String,

    /// Params JSON file (stdin when omitted or '-')
    pub file: Option<PathBuf>,

    /// Fail when unknown fields are dropped (overrides config)
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub method: String,
    pub kind: MessageKind,
    pub canonical: Value,
    pub lossless: bool,
    pub dropped: Vec<String>,
}

/// Decode `input` as the params of `method`, re-encode and compare.
pub fn check(method: &str, input: Value) -> Result<CheckReport, WireError> {
    let info =
        protocol::lookup(method).ok_or_else(|| WireError::UnknownMethod(method.to_string()))?;
    let canonical = info.roundtrip(input.clone())?;
    let dropped = codec::dropped_fields(&input, &canonical);

    Ok(CheckReport {
        method: info.method.to_string(),
        kind: info.kind,
        lossless: input == canonical,
        canonical,
        dropped,
    })
}

fn read_input(file: Option<&PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub fn execute(args: CheckArgs, app: &App) -> Result<()> {
    let raw = read_input(args.file.as_ref())?;
    let input: Value = codec::decode(&raw)?;
    let report = check(&args.method, input)?;

    let strict = args.strict || app.config().check.strict_unknown_fields;
    if strict && !report.dropped.is_empty() {
        anyhow::bail!(
            "Strict mode: {} field(s) dropped: {}",
            report.dropped.len(),
            report.dropped.join(", ")
        );
    }

    if !report.lossless {
        tracing::debug!("{} params changed in round trip", report.method);
    }
    app.output.print_success_flat(report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_lossless() {
        let input = json!({"type": 2, "message": "hi"});
        let report = check("window/showMessage", input.clone()).unwrap();
        assert!(report.lossless);
        assert!(report.dropped.is_empty());
        assert_eq!(report.canonical, input);
        assert_eq!(report.kind, MessageKind::Notification);
    }

    #[test]
    fn test_check_reports_dropped_fields() {
        let report = check(
            "workspace/symbol",
            json!({"query": "foo", "workDoneToken": "abc", "x-vendor": 1}),
        )
        .unwrap();
        assert!(!report.lossless);
        assert_eq!(report.dropped, vec!["/x-vendor".to_string()]);
        assert_eq!(report.canonical, json!({"query": "foo", "workDoneToken": "abc"}));
    }

    #[test]
    fn test_check_normalised_severity() {
        let report = check(
            "textDocument/publishDiagnostics",
            json!({
                "uri": "file:///a",
                "diagnostics": [{
                    "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 1}},
                    "severity": 0,
                    "message": "m"
                }]
            }),
        )
        .unwrap();
        assert_eq!(report.dropped, vec!["/diagnostics/0/severity".to_string()]);
    }

    #[test]
    fn test_check_reports_normalised_number() {
        let report = check("window/showMessage", json!({"type": 2.7, "message": "x"})).unwrap();
        assert!(!report.lossless);
        assert_eq!(report.dropped, vec!["/type".to_string()]);
        assert_eq!(report.canonical, json!({"type": 2, "message": "x"}));
    }

    #[test]
    fn test_check_decode_error() {
        let err = check("$/progress", json!({"token": true, "value": null})).unwrap_err();
        assert_eq!(err.path(), Some("/token"));
    }

    #[test]
    fn test_check_unknown_method() {
        assert!(matches!(
            check("textDocument/hover", json!({})),
            Err(WireError::UnknownMethod(_))
        ));
    }
}
