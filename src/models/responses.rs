//! Response-side types for the API client
//!
//! Defines the error body shape returned by the backend on non-2xx responses.

use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the backend.
///
/// The backend reports failures as `{"detail": "..."}`; validation failures
/// carry a list under `detail` instead (`[{"loc": [...], "msg": "..."}]`).
/// Some routes use `{"message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorBody {
    /// Parses an error body, treating anything malformed as empty.
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Best available message: `detail`, then `message`, then `HTTP {status}`.
    pub fn into_message(self, status: u16) -> String {
        self.detail
            .as_ref()
            .and_then(detail_message)
            .or_else(|| match self.message {
                Some(Value::String(m)) if !m.is_empty() => Some(m),
                _ => None,
            })
            .unwrap_or_else(|| format!("HTTP {}", status))
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
