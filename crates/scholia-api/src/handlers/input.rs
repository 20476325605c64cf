use serde_json::Value;

use scholia_persist::is_valid_id;
use scholia_types::ChatMode;

use crate::error::{ApiError, ApiResult};

/// Non-blank text field. The value is returned untrimmed.
pub fn required_text(field: &str, value: Option<String>) -> ApiResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest(format!("{} is required", field))),
    }
}

pub fn required_id(field: &str, value: Option<String>) -> ApiResult<String> {
    let id = required_text(field, value)?;
    check_id(field, id.trim())
}

/// Blank ids are treated as absent.
pub fn optional_id(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    match value {
        Some(id) if !id.trim().is_empty() => check_id(field, id.trim()).map(Some),
        _ => Ok(None),
    }
}

fn check_id(field: &str, id: &str) -> ApiResult<String> {
    if is_valid_id(id) {
        Ok(id.to_string())
    } else {
        Err(ApiError::BadRequest(format!("Invalid {}: {}", field, id)))
    }
}

/// Mode ids arrive as `"1"` or `1`; null and empty mean "not chosen".
pub fn parse_mode(value: Option<Value>) -> ApiResult<Option<ChatMode>> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Invalid modeId: {}", other)));
        }
    };

    raw.parse::<ChatMode>()
        .map(Some)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
