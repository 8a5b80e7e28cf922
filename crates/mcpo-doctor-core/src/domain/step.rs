//! Lifecycle step results returned by the managed server.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status string that marks a step as successful.
pub const SUCCESS_STATUS: &str = "success";

/// Action accepted by `manage_server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerAction {
    Start,
    Stop,
}

impl ServerAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ServerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a [`StepResult`] was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    /// `success` is true or `status` is `"success"`.
    Succeeded,
    /// At least one classification field is present but neither signals success.
    Failed,
    /// Neither classification field is present.
    Unrecognized,
}

/// Structured result of a managed-server operation.
///
/// Both classification fields are optional so that results carrying either
/// a boolean flag or a status string share one type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl StepResult {
    /// A result with `success: true`.
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A result with `success: false` and a machine-readable status.
    pub fn failed(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            status: Some(status.into()),
            message: Some(message.into()),
            data: None,
        }
    }

    /// A result that only carries `status`.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Classify the result.
    pub fn classify(&self) -> StepVerdict {
        if self.success == Some(true) || self.status.as_deref() == Some(SUCCESS_STATUS) {
            StepVerdict::Succeeded
        } else if self.success.is_none() && self.status.is_none() {
            StepVerdict::Unrecognized
        } else {
            StepVerdict::Failed
        }
    }

    pub fn is_success(&self) -> bool {
        self.classify() == StepVerdict::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> StepResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_flag() {
        assert_eq!(parse(json!({"success": true})).classify(), StepVerdict::Succeeded);
    }

    #[test]
    fn test_success_status() {
        assert_eq!(
            parse(json!({"status": "success", "message": "ok"})).classify(),
            StepVerdict::Succeeded
        );
    }

    #[test]
    fn test_status_wins_over_false_flag() {
        assert!(parse(json!({"success": false, "status": "success"})).is_success());
    }

    #[test]
    fn test_failure_shapes() {
        assert_eq!(parse(json!({"success": false})).classify(), StepVerdict::Failed);
        assert_eq!(parse(json!({"status": "error"})).classify(), StepVerdict::Failed);
        assert_eq!(parse(json!({"status": "SUCCESS"})).classify(), StepVerdict::Failed);
    }

    #[test]
    fn test_unrecognized_shape() {
        let result = parse(json!({"message": "hello", "data": [1, 2]}));
        assert_eq!(result.classify(), StepVerdict::Unrecognized);
        assert!(!result.is_success());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let json = serde_json::to_string(&StepResult::with_status("success")).unwrap();
        assert_eq!(json, r#"{"status":"success"}"#);
    }

    #[test]
    fn test_server_action_names() {
        assert_eq!(ServerAction::Start.to_string(), "start");
        assert_eq!(ServerAction::Stop.as_str(), "stop");
    }
}
