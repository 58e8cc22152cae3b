use serde::{Deserialize, Serialize};
use strum::Display;

use super::Extra;

/// Handle of an asynchronous Compute Engine operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_message: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    #[default]
    Pending,
    Running,
    Done,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Human readable failure of a finished operation, if any.
    pub fn failure(&self) -> Option<String> {
        let errors: Vec<String> = self
            .error
            .iter()
            .flat_map(|error| error.errors.iter())
            .map(|item| {
                let code = item.code.as_deref().unwrap_or("UNKNOWN");
                match &item.message {
                    Some(message) => format!("{}: {}", code, message),
                    None => code.to_string(),
                }
            })
            .collect();

        if !errors.is_empty() {
            return Some(format!("operation {} failed: {}", self.name, errors.join(", ")));
        }

        self.http_error_status_code
            .filter(|code| *code >= 400)
            .map(|code| {
                format!(
                    "operation {} failed with HTTP {}: {}",
                    self.name,
                    code,
                    self.http_error_message.as_deref().unwrap_or_default()
                )
            })
    }
}
