//! Diagnostic model
//!
//! `textDocument/publishDiagnostics` and the structures it carries.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::basic::{DocumentUri, Integer, Location, Range, Uri};
use super::macros::int_enum;
use super::serde_util;

int_enum! {
    /// Severity levels (matches LSP spec)
    ///
    /// `UNSPECIFIED` stands for an absent `severity` key; clients pick their
    /// own default for it.
    pub struct DiagnosticSeverity(i32) {
        UNSPECIFIED = 0 => "unspecified",
        ERROR = 1 => "error",
        WARNING = 2 => "warning",
        INFORMATION = 3 => "info",
        HINT = 4 => "hint",
    }
}

impl DiagnosticSeverity {
    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }
}

impl Default for DiagnosticSeverity {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

int_enum! {
    /// Diagnostic tag (LSP spec)
    pub struct DiagnosticTag(i32) {
        /// Unused or unnecessary code; clients may fade it out.
        UNNECESSARY = 1 => "unnecessary",
        /// Deprecated or obsolete code; clients may strike it through.
        DEPRECATED = 2 => "deprecated",
    }
}

/// Diagnostic code: a JSON number or a JSON string, re-encoded as whichever it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Number(Integer),
    String(String),
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<Integer> for DiagnosticCode {
    fn from(code: Integer) -> Self {
        Self::Number(code)
    }
}

impl From<&str> for DiagnosticCode {
    fn from(code: &str) -> Self {
        Self::String(code.to_string())
    }
}

impl From<String> for DiagnosticCode {
    fn from(code: String) -> Self {
        Self::String(code)
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_i32(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

struct CodeVisitor;

impl<'de> Visitor<'de> for CodeVisitor {
    type Value = DiagnosticCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a diagnostic code (string or integer)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DiagnosticCode::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(DiagnosticCode::String(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Integer::try_from(v)
            .map(DiagnosticCode::Number)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Integer::try_from(v)
            .map(DiagnosticCode::Number)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    // Echoed back verbatim, so only integral floats (`3.0`) are accepted.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && v >= Integer::MIN as f64 && v <= Integer::MAX as f64 {
            Ok(DiagnosticCode::Number(v as Integer))
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for DiagnosticCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CodeVisitor)
    }
}

/// Link to documentation about a diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDescription {
    pub href: Uri,
}

/// Related diagnostic information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub location: Location,
    pub message: String,
}

/// LSP Diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub range: Range,
    #[serde(default, skip_serializing_if = "DiagnosticSeverity::is_unspecified")]
    pub severity: DiagnosticSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<DiagnosticCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_description: Option<CodeDescription>,
    /// Human-readable origin, e.g. `typescript` or `super lint`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DiagnosticTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
    /// Opaque data preserved between publish and code action requests.
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: None,
            code_description: None,
            source: None,
            message: message.into(),
            tags: Vec::new(),
            related_information: Vec::new(),
            data: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<DiagnosticCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn display_line(&self) -> u32 {
        self.range.start.line + 1
    }

    pub fn display_column(&self) -> u32 {
        self.range.start.character + 1
    }
}

/// Params of `textDocument/publishDiagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishDiagnosticsParams {
    pub uri: DocumentUri,
    /// Document version the diagnostics were computed for; absent means they
    /// apply regardless of version.
    #[serde(
        default,
        deserialize_with = "serde_util::opt_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<Integer>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::basic::Position;
    use serde_json::json;

    fn sample_range() -> Range {
        Range::new(Position::new(0, 0), Position::new(0, 5))
    }

    #[test]
    fn test_publish_diagnostics_exact_encoding() {
        let params = PublishDiagnosticsParams {
            uri: "file:///a.go".to_string(),
            version: None,
            diagnostics: vec![Diagnostic::new(
                sample_range(),
                DiagnosticSeverity::ERROR,
                "unused import",
            )],
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"uri":"file:///a.go","diagnostics":[{"range":{"start":{"line":0,"character":0},"end":{"line":0,"character":5}},"severity":1,"message":"unused import"}]}"#
        );
    }

    #[test]
    fn test_severity_absent_is_unspecified() {
        let json = r#"{"range":{"start":{"line":0,"character":0},"end":{"line":0,"character":5}},"message":"x"}"#;
        let diag: Diagnostic = serde_json::from_str(json).unwrap();
        assert_eq!(diag.severity, DiagnosticSeverity::UNSPECIFIED);
        assert!(diag.severity.is_unspecified());
        assert_eq!(serde_json::to_string(&diag).unwrap(), json);
    }

    #[test]
    fn test_severity_out_of_range_roundtrip() {
        let value = json!({
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 5}},
            "severity": 99,
            "message": "x"
        });
        let diag: Diagnostic = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(diag.severity.value(), 99);
        assert!(!diag.severity.is_known());
        assert_eq!(diag.severity.to_string(), "99");
        assert_eq!(serde_json::to_value(&diag).unwrap(), value);
    }

    #[test]
    fn test_code_keeps_json_type() {
        let numeric: DiagnosticCode = serde_json::from_str("1569").unwrap();
        let text: DiagnosticCode = serde_json::from_str(r#""1569""#).unwrap();
        assert_eq!(numeric, DiagnosticCode::Number(1569));
        assert_eq!(text, DiagnosticCode::String("1569".to_string()));
        assert_ne!(numeric, text);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "1569");
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""1569""#);
        assert_eq!(numeric.to_string(), text.to_string());
    }

    #[test]
    fn test_code_rejects_other_types() {
        assert!(serde_json::from_str::<DiagnosticCode>("true").is_err());
        assert!(serde_json::from_str::<DiagnosticCode>("[1]").is_err());
        assert!(serde_json::from_str::<DiagnosticCode>("1.5").is_err());
        assert_eq!(
            serde_json::from_str::<DiagnosticCode>("7.0").unwrap(),
            DiagnosticCode::Number(7)
        );
    }

    #[test]
    fn test_full_diagnostic_roundtrip() {
        let value = json!({
            "range": {"start": {"line": 3, "character": 1}, "end": {"line": 3, "character": 9}},
            "severity": 2,
            "code": "E0425",
            "codeDescription": {"href": "https://doc.rust-lang.org/error_codes/E0425.html"},
            "source": "rustc",
            "message": "cannot find value",
            "tags": [1, 7],
            "relatedInformation": [{
                "location": {
                    "uri": "file:///lib.rs",
                    "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 3}}
                },
                "message": "defined here"
            }],
            "data": {"fixId": 12}
        });
        let diag: Diagnostic = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(diag.severity, DiagnosticSeverity::WARNING);
        assert_eq!(diag.tags, vec![DiagnosticTag::UNNECESSARY, DiagnosticTag(7)]);
        assert_eq!(diag.display_line(), 4);
        assert_eq!(serde_json::to_value(&diag).unwrap(), value);
    }

    #[test]
    fn test_null_data_is_kept() {
        let value = json!({
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 1}},
            "message": "x",
            "data": null
        });
        let diag: Diagnostic = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(diag.data, Some(Value::Null));
        assert_eq!(serde_json::to_value(&diag).unwrap(), value);

        let absent = json!({
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 1}},
            "message": "x"
        });
        let diag: Diagnostic = serde_json::from_value(absent.clone()).unwrap();
        assert_eq!(diag.data, None);
        assert_eq!(serde_json::to_value(&diag).unwrap(), absent);
    }

    #[test]
    fn test_publish_diagnostics_version() {
        let params: PublishDiagnosticsParams =
            serde_json::from_str(r#"{"uri":"file:///a.go","version":4,"diagnostics":[]}"#)
                .unwrap();
        assert_eq!(params.version, Some(4));

        let unversioned: PublishDiagnosticsParams =
            serde_json::from_str(r#"{"uri":"file:///a.go","diagnostics":[]}"#).unwrap();
        assert_eq!(unversioned.version, None);
        assert_eq!(
            serde_json::to_string(&unversioned).unwrap(),
            r#"{"uri":"file:///a.go","diagnostics":[]}"#
        );
    }

    #[test]
    fn test_missing_message_is_error() {
        let err = serde_json::from_str::<Diagnostic>(
            r#"{"range":{"start":{"line":0,"character":0},"end":{"line":0,"character":0}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing field `message`"));
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<DiagnosticSeverity>(), Ok(DiagnosticSeverity::ERROR));
        assert_eq!("Info".parse::<DiagnosticSeverity>(), Ok(DiagnosticSeverity::INFORMATION));
        assert_eq!("7".parse::<DiagnosticSeverity>(), Ok(DiagnosticSeverity(7)));
        assert!("fatal".parse::<DiagnosticSeverity>().is_err());
    }
}
