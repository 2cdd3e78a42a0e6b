//! Window features: user-facing messages, logging and document display

use serde::{Deserialize, Serialize};

use super::basic::{Range, Uri};
use super::macros::int_enum;
use super::progress::ProgressToken;

int_enum! {
    /// Message severity, from most (`ERROR`) to least (`LOG`) severe.
    pub struct MessageType(i32) {
        ERROR = 1 => "error",
        WARNING = 2 => "warning",
        INFO = 3 => "info",
        LOG = 4 => "log",
    }
}

impl MessageType {
    /// Whether a message of this type passes a `threshold` filter.
    ///
    /// Lower ordinals are more severe, so a message is shown when its own
    /// level is numerically at or below the threshold's.
    pub fn enabled(self, threshold: MessageType) -> bool {
        self.0 <= threshold.0
    }
}

/// Params of `window/showMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMessageParams {
    #[serde(rename = "type")]
    pub typ: MessageType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageActionItem {
    pub title: String,
}

impl MessageActionItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Params of `window/showMessageRequest`; the response is the chosen
/// [`MessageActionItem`] or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMessageRequestParams {
    #[serde(rename = "type")]
    pub typ: MessageType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<MessageActionItem>>,
}

/// Params of `window/logMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessageParams {
    #[serde(rename = "type")]
    pub typ: MessageType,
    pub message: String,
}

/// Params of `$/logTrace`; `verbose` is only sent when tracing is `verbose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogTraceParams {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<String>,
}

/// Params of `window/showDocument`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDocumentParams {
    pub uri: Uri,
    /// Show the resource in an external program, e.g. a browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Range>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDocumentResult {
    pub success: bool,
}

/// Params of `window/workDoneProgress/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDoneProgressCreateParams {
    pub token: ProgressToken,
}

/// Params of `window/workDoneProgress/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDoneProgressCancelParams {
    pub token: ProgressToken,
}
