use opendota_model::RequestError;
use serde_json::Value;

/// Substituted for maintenance pages served instead of JSON.
pub const NODE_DISABLED_BODY: &str = r#"{"error":"Node disabled"}"#;

const HTML_DOCTYPE: &str = "<!doctype html";

pub fn is_maintenance_page(body: &str) -> bool {
    body.to_ascii_lowercase().contains(HTML_DOCTYPE)
}

/// Decodes a response body and turns error payloads into [`RequestError`].
pub fn parse(body: &str) -> Result<Value, RequestError> {
    let value: Value = serde_json::from_str(body).map_err(|_| RequestError::InvalidResponse)?;
    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        return Err(RequestError::from_api_message(&error_message(error)));
    }
    if is_empty_payload(&value) {
        return Err(RequestError::EmptyResponse);
    }
    Ok(value)
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
