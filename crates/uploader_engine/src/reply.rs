use serde_json::Value;

use crate::{FailureKind, UploadError};

/// The two fields the uploader reads from a reply body.
///
/// Fields are duck-typed: `message` is kept only when truthy, `error` whenever
/// it is present and not `null`. Non-string values keep their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerReply {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Decodes a reply body.
///
/// Any JSON value is accepted; anything but an object reads as an empty
/// reply. A `null` body fails, since there is nothing to read fields from.
pub fn parse_reply(body: &[u8]) -> Result<ServerReply, UploadError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| UploadError::new(FailureKind::InvalidJson, err.to_string()))?;

    match value {
        Value::Null => Err(UploadError::new(
            FailureKind::NullReply,
            "cannot read properties of null (reading 'message')",
        )),
        Value::Object(fields) => Ok(ServerReply {
            message: fields
                .get("message")
                .filter(|value| is_truthy(value))
                .map(display_value),
            error: fields
                .get("error")
                .filter(|value| !value.is_null())
                .map(display_value),
        }),
        _ => Ok(ServerReply::default()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// JSON text, not browser coercion: objects render as `{"code":7}`, not `[object Object]`.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
