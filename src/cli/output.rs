//! Output formatting for CLI commands

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::codec;
use crate::error::WireError;

/// Output context for consistent formatting across commands
///
/// Every command prints exactly one JSON object carrying a `success` flag.
#[derive(Debug, Clone)]
pub struct OutputContext {
    /// Project root for relative path calculation
    root: PathBuf,
    pretty: bool,
}

impl OutputContext {
    pub fn new(root: PathBuf, pretty: bool) -> Self {
        Self { root, pretty }
    }

    /// Convert an absolute path to relative (if within project root)
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    /// Print a successful response with data fields at top level
    pub fn print_success_flat<T: Serialize>(&self, data: T) {
        let mut response = serde_json::to_value(data).unwrap_or(serde_json::json!({}));
        if let Some(obj) = response.as_object_mut() {
            obj.insert("success".to_string(), Value::Bool(true));
        }
        self.print_json(&response);
    }

    fn print_json(&self, value: &Value) {
        match codec::render(value, self.pretty) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize output: {e}"),
        }
    }
}

pub fn error_response(message: &str) -> Value {
    serde_json::json!({
        "success": false,
        "error": message
    })
}

/// Error response for a failed command; wire errors add their JSON-RPC
/// `code` and, for decode failures, the offending `path`.
pub fn failure_response(err: &anyhow::Error) -> Value {
    let mut response = error_response(&err.to_string());
    if let Some(wire) = err.downcast_ref::<WireError>() {
        response["code"] = wire.error_code().into();
        if let Some(path) = wire.path() {
            response["path"] = path.into();
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let ctx = OutputContext::new(PathBuf::from("/project"), true);

        assert_eq!(
            ctx.relative_path(Path::new("/project/.lsp-wire.toml")),
            ".lsp-wire.toml"
        );

        // Path outside project stays absolute
        assert_eq!(
            ctx.relative_path(Path::new("/home/u/.config/lsp-wire/config.toml")),
            "/home/u/.config/lsp-wire/config.toml"
        );
    }

    #[test]
    fn test_failure_response_codes() {
        use crate::error::error_codes;

        let syntax = codec::decode::<Value>(b"{\"type\": 2,").unwrap_err();
        let response = failure_response(&anyhow::Error::from(syntax));
        assert_eq!(response["code"], error_codes::PARSE_ERROR);
        assert!(response.get("path").is_none());

        let mismatch = codec::decode_str::<crate::models::window::ShowMessageParams>(
            r#"{"type": "warning", "message": "m"}"#,
        )
        .unwrap_err();
        let response = failure_response(&anyhow::Error::from(mismatch));
        assert_eq!(response["code"], error_codes::INVALID_PARAMS);
        assert_eq!(response["path"], "/type");

        let plain = failure_response(&anyhow::anyhow!("Failed to read stdin"));
        assert_eq!(
            plain,
            serde_json::json!({"success": false, "error": "Failed to read stdin"})
        );
    }

    #[test]
    fn test_error_response_shape() {
        assert_eq!(
            error_response("boom"),
            serde_json::json!({"success": false, "error": "boom"})
        );
    }
}
