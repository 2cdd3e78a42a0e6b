//! Progress tokens and work-done progress reporting
//!
//! A token is either a string or an integer and must be echoed back in the
//! exact representation the peer chose: `1569` never becomes `"1569"`.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::basic::{Integer, UInteger};
use super::serde_util;
use crate::codec;
use crate::error::{ProgressError, WireResult};

// ============================================================================
// Progress Token
// ============================================================================

/// Token correlating a sequence of progress notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProgressToken {
    Number(Integer),
    String(String),
}

impl ProgressToken {
    pub fn number(token: Integer) -> Self {
        Self::Number(token)
    }

    pub fn string(token: impl Into<String>) -> Self {
        Self::String(token.into())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for ProgressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<Integer> for ProgressToken {
    fn from(token: Integer) -> Self {
        Self::Number(token)
    }
}

impl From<&str> for ProgressToken {
    fn from(token: &str) -> Self {
        Self::String(token.to_string())
    }
}

impl From<String> for ProgressToken {
    fn from(token: String) -> Self {
        Self::String(token)
    }
}

impl Serialize for ProgressToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_i32(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = ProgressToken;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a progress token (string or integer)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ProgressToken::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ProgressToken::String(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Integer::try_from(v)
            .map(ProgressToken::Number)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Integer::try_from(v)
            .map(ProgressToken::Number)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    // Echoed back verbatim, so only integral floats (`3.0`) are accepted.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && v >= Integer::MIN as f64 && v <= Integer::MAX as f64 {
            Ok(ProgressToken::Number(v as Integer))
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for ProgressToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

// ============================================================================
// Work Done Progress Payloads
// ============================================================================

/// Start of a long-running operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkDoneProgressBegin {
    /// Mandatory title, e.g. "Indexing".
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Expected in 0..=100 (not enforced).
    #[serde(
        default,
        deserialize_with = "serde_util::opt_uinteger",
        skip_serializing_if = "Option::is_none"
    )]
    pub percentage: Option<UInteger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkDoneProgressReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_util::opt_uinteger",
        skip_serializing_if = "Option::is_none"
    )]
    pub percentage: Option<UInteger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkDoneProgressEnd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Work-done payload, discriminated on the wire by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkDoneProgress {
    Begin(WorkDoneProgressBegin),
    Report(WorkDoneProgressReport),
    End(WorkDoneProgressEnd),
}

/// Params of `$/progress`.
///
/// `value` is kept as raw JSON since the same notification also streams
/// partial results; use [`ProgressParams::as_work_done`] for work-done payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressParams {
    pub token: ProgressToken,
    pub value: Value,
}

impl ProgressParams {
    pub fn work_done(token: ProgressToken, progress: &WorkDoneProgress) -> WireResult<Self> {
        Ok(Self {
            token,
            value: codec::encode_value(progress)?,
        })
    }

    /// Whether `value` carries a work-done `kind` discriminator.
    pub fn is_work_done(&self) -> bool {
        matches!(
            self.value.get("kind").and_then(Value::as_str),
            Some("begin" | "report" | "end")
        )
    }

    pub fn as_work_done(&self) -> WireResult<WorkDoneProgress> {
        codec::decode_value(self.value.clone())
    }
}

// ============================================================================
// Param and Option Mixins
// ============================================================================

// Modelled request params carry these keys as plain fields. The blocks on
// their own read the tokens out of any request's params, since unknown keys
// are ignored.

/// Work-done token channel of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDoneProgressParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

/// Partial-result token channel of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResultParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_result_token: Option<ProgressToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDoneProgressOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_progress: Option<bool>,
}

// ============================================================================
// Progress Tracker
// ============================================================================

/// Where a token is in its begin/report/end sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressState {
    Active {
        title: String,
        message: Option<String>,
        percentage: Option<UInteger>,
    },
    Ended {
        message: Option<String>,
    },
}

/// Ended tokens remembered by default, so late reports are flagged as
/// `AlreadyEnded` and not `NotStarted`.
pub const DEFAULT_ENDED_RETENTION: usize = 256;

/// Checks that work-done notifications follow Begin -> Report* -> End per token.
///
/// A token may be reused once it has ended, starting again with a Begin.
/// Only the most recently ended tokens are kept; older ones are forgotten and
/// behave as if never seen.
#[derive(Debug)]
pub struct ProgressTracker {
    states: HashMap<ProgressToken, ProgressState>,
    ended: VecDeque<ProgressToken>,
    retention: usize,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::with_retention(DEFAULT_ENDED_RETENTION)
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember at most `retention` ended tokens (at least the latest one).
    pub fn with_retention(retention: usize) -> Self {
        Self {
            states: HashMap::new(),
            ended: VecDeque::new(),
            retention: retention.max(1),
        }
    }

    pub fn observe(
        &mut self,
        token: &ProgressToken,
        progress: &WorkDoneProgress,
    ) -> Result<&ProgressState, ProgressError> {
        let current = self.states.get(token);
        let next = match (progress, current) {
            (WorkDoneProgress::Begin(_), Some(ProgressState::Active { .. })) => {
                return Err(ProgressError::AlreadyStarted {
                    token: token.clone(),
                });
            }
            (WorkDoneProgress::Begin(begin), _) => ProgressState::Active {
                title: begin.title.clone(),
                message: begin.message.clone(),
                percentage: begin.percentage,
            },
            (
                WorkDoneProgress::Report(report),
                Some(ProgressState::Active {
                    title,
                    message,
                    percentage,
                }),
            ) => ProgressState::Active {
                title: title.clone(),
                message: report.message.clone().or_else(|| message.clone()),
                percentage: report.percentage.or(*percentage),
            },
            (WorkDoneProgress::End(end), Some(ProgressState::Active { .. })) => {
                ProgressState::Ended {
                    message: end.message.clone(),
                }
            }
            (_, Some(ProgressState::Ended { .. })) => {
                return Err(ProgressError::AlreadyEnded {
                    token: token.clone(),
                });
            }
            (_, None) => {
                return Err(ProgressError::NotStarted {
                    token: token.clone(),
                });
            }
        };

        tracing::debug!("Progress {} -> {:?}", token, next);
        let ended = matches!(next, ProgressState::Ended { .. });
        self.states.insert(token.clone(), next);
        if ended {
            self.retain_ended(token);
        } else {
            self.ended.retain(|t| t != token);
        }

        Ok(&self.states[token])
    }

    fn retain_ended(&mut self, token: &ProgressToken) {
        self.ended.push_back(token.clone());
        while self.ended.len() > self.retention {
            if let Some(oldest) = self.ended.pop_front() {
                self.states.remove(&oldest);
            }
        }
    }

    /// Drop everything known about `token`, active or ended.
    pub fn forget(&mut self, token: &ProgressToken) -> Option<ProgressState> {
        self.ended.retain(|t| t != token);
        self.states.remove(token)
    }

    /// Number of tokens currently remembered, active or ended.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Track a `$/progress` notification. Partial-result payloads are ignored
    /// and yield `Ok(None)`.
    pub fn observe_params(&mut self, params: &ProgressParams) -> WireResult<Option<&ProgressState>> {
        if !params.is_work_done() {
            return Ok(None);
        }
        let progress = params.as_work_done()?;
        Ok(Some(self.observe(&params.token, &progress)?))
    }

    pub fn state(&self, token: &ProgressToken) -> Option<&ProgressState> {
        self.states.get(token)
    }

    pub fn is_active(&self, token: &ProgressToken) -> bool {
        matches!(self.states.get(token), Some(ProgressState::Active { .. }))
    }

    pub fn active_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, ProgressState::Active { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn begin(title: &str) -> WorkDoneProgress {
        WorkDoneProgress::Begin(WorkDoneProgressBegin {
            title: title.to_string(),
            ..Default::default()
        })
    }

    fn report(percentage: u32) -> WorkDoneProgress {
        WorkDoneProgress::Report(WorkDoneProgressReport {
            percentage: Some(percentage),
            ..Default::default()
        })
    }

    fn end() -> WorkDoneProgress {
        WorkDoneProgress::End(WorkDoneProgressEnd::default())
    }

    #[test]
    fn test_number_token_encodes_as_integer() {
        let params = WorkDoneProgressParams {
            work_done_token: Some(ProgressToken::number(1569)),
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"workDoneToken":1569}"#
        );

        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            token: ProgressToken,
        }
        let wrapped = Wrapper {
            token: ProgressToken::number(1569),
        };
        assert_eq!(serde_json::to_string(&wrapped).unwrap(), r#"{"token":1569}"#);

        let decoded: Wrapper = serde_json::from_str(r#"{"token":1569}"#).unwrap();
        assert!(decoded.token.is_number());
        assert_eq!(decoded.token.to_string(), "1569");
        assert_ne!(decoded.token, ProgressToken::string("1569"));
    }

    #[test]
    fn test_token_blocks_read_any_params() {
        let hover = json!({
            "textDocument": {"uri": "file:///a.rs"},
            "position": {"line": 1, "character": 2},
            "workDoneToken": "hover-1",
            "partialResultToken": 12
        });
        let work_done: WorkDoneProgressParams = codec::decode_value(hover.clone()).unwrap();
        let partial: PartialResultParams = codec::decode_value(hover).unwrap();
        assert_eq!(work_done.work_done_token, Some(ProgressToken::string("hover-1")));
        assert_eq!(partial.partial_result_token, Some(ProgressToken::number(12)));
    }

    #[test]
    fn test_string_token_stays_string() {
        let token: ProgressToken = serde_json::from_str(r#""1569""#).unwrap();
        assert!(token.is_string());
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""1569""#);
    }

    #[test]
    fn test_token_rejects_other_types() {
        for bad in ["true", "null", "{}", "[1]"] {
            let err = serde_json::from_str::<ProgressToken>(bad).unwrap_err();
            assert!(err.to_string().contains("progress token"), "{}", bad);
        }
    }

    #[test]
    fn test_work_done_begin_encoding() {
        let progress = WorkDoneProgress::Begin(WorkDoneProgressBegin {
            title: "Indexing".to_string(),
            cancellable: Some(false),
            message: None,
            percentage: Some(0),
        });
        assert_eq!(
            serde_json::to_string(&progress).unwrap(),
            r#"{"kind":"begin","title":"Indexing","cancellable":false,"percentage":0}"#
        );
    }

    #[test]
    fn test_work_done_decoding() {
        let report: WorkDoneProgress =
            serde_json::from_str(r#"{"kind":"report","message":"3/10","percentage":30.0}"#)
                .unwrap();
        assert_eq!(
            report,
            WorkDoneProgress::Report(WorkDoneProgressReport {
                cancellable: None,
                message: Some("3/10".to_string()),
                percentage: Some(30),
            })
        );

        let end: WorkDoneProgress = serde_json::from_str(r#"{"kind":"end"}"#).unwrap();
        assert_eq!(end, WorkDoneProgress::End(WorkDoneProgressEnd { message: None }));

        assert!(serde_json::from_str::<WorkDoneProgress>(r#"{"kind":"pause"}"#).is_err());
        assert!(serde_json::from_str::<WorkDoneProgress>(r#"{"kind":"begin"}"#).is_err());
    }

    #[test]
    fn test_progress_params_work_done() {
        let params = ProgressParams::work_done(ProgressToken::string("idx"), &report(50)).unwrap();
        assert!(params.is_work_done());
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"token": "idx", "value": {"kind": "report", "percentage": 50}})
        );
        assert_eq!(params.as_work_done().unwrap(), report(50));

        let partial = ProgressParams {
            token: ProgressToken::number(3),
            value: json!([{"name": "main"}]),
        };
        assert!(!partial.is_work_done());
    }

    #[test]
    fn test_tracker_linear_sequence() {
        let mut tracker = ProgressTracker::new();
        let token = ProgressToken::number(1);

        tracker.observe(&token, &begin("Indexing")).unwrap();
        assert!(tracker.is_active(&token));

        let state = tracker.observe(&token, &report(40)).unwrap();
        assert_eq!(
            *state,
            ProgressState::Active {
                title: "Indexing".to_string(),
                message: None,
                percentage: Some(40),
            }
        );

        tracker.observe(&token, &end()).unwrap();
        assert!(!tracker.is_active(&token));
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_tracker_rejects_out_of_order() {
        let mut tracker = ProgressTracker::new();
        let token = ProgressToken::string("t");

        assert_eq!(
            tracker.observe(&token, &report(1)),
            Err(ProgressError::NotStarted {
                token: token.clone()
            })
        );
        tracker.observe(&token, &begin("a")).unwrap();
        assert_eq!(
            tracker.observe(&token, &begin("b")),
            Err(ProgressError::AlreadyStarted {
                token: token.clone()
            })
        );
        tracker.observe(&token, &end()).unwrap();
        assert_eq!(
            tracker.observe(&token, &report(2)),
            Err(ProgressError::AlreadyEnded {
                token: token.clone()
            })
        );
        assert!(tracker.observe(&token, &end()).is_err());

        // Reuse after end requires a fresh begin.
        tracker.observe(&token, &begin("again")).unwrap();
        assert!(tracker.is_active(&token));
    }

    #[test]
    fn test_tracker_bounds_ended_tokens() {
        let mut tracker = ProgressTracker::with_retention(2);
        for n in 0..10 {
            let token = ProgressToken::number(n);
            tracker.observe(&token, &begin("job")).unwrap();
            tracker.observe(&token, &end()).unwrap();
        }
        assert_eq!(tracker.len(), 2);
        assert!(tracker.state(&ProgressToken::number(9)).is_some());
        assert!(tracker.state(&ProgressToken::number(0)).is_none());

        // An evicted token is unknown again.
        assert_eq!(
            tracker.observe(&ProgressToken::number(0), &report(1)),
            Err(ProgressError::NotStarted {
                token: ProgressToken::number(0)
            })
        );
        assert_eq!(
            tracker.observe(&ProgressToken::number(9), &report(1)),
            Err(ProgressError::AlreadyEnded {
                token: ProgressToken::number(9)
            })
        );
    }

    #[test]
    fn test_tracker_keeps_active_tokens() {
        let mut tracker = ProgressTracker::with_retention(1);
        let long_running = ProgressToken::string("long");
        tracker.observe(&long_running, &begin("index")).unwrap();
        for n in 0..5 {
            let token = ProgressToken::number(n);
            tracker.observe(&token, &begin("job")).unwrap();
            tracker.observe(&token, &end()).unwrap();
        }
        assert!(tracker.is_active(&long_running));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_tracker_forget() {
        let mut tracker = ProgressTracker::new();
        let token = ProgressToken::number(4);
        tracker.observe(&token, &begin("a")).unwrap();
        assert!(matches!(
            tracker.forget(&token),
            Some(ProgressState::Active { .. })
        ));
        assert!(tracker.is_empty());
        assert!(tracker.forget(&token).is_none());
    }

    #[test]
    fn test_token_rejects_fractional_number() {
        let err = serde_json::from_str::<ProgressToken>("1.5").unwrap_err();
        assert!(err.to_string().contains("progress token"));
        assert_eq!(
            serde_json::from_str::<ProgressToken>("2.0").unwrap(),
            ProgressToken::number(2)
        );
    }

    #[test]
    fn test_tracker_keys_by_token_type() {
        let mut tracker = ProgressTracker::new();
        tracker
            .observe(&ProgressToken::number(5), &begin("numeric"))
            .unwrap();
        assert!(!tracker.is_active(&ProgressToken::string("5")));
    }

    #[test]
    fn test_tracker_ignores_partial_results() {
        let mut tracker = ProgressTracker::new();
        let params = ProgressParams {
            token: ProgressToken::number(9),
            value: json!({"items": []}),
        };
        assert!(tracker.observe_params(&params).unwrap().is_none());
        assert!(tracker.state(&ProgressToken::number(9)).is_none());
    }
}
