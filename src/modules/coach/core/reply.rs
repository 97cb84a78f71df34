use serde_json::Value;

/// Extracts the coach's text from a reply body.
///
/// Accepts `{"text": "..."}`, a JSON string holding that object, or a plain
/// string. Anything else is unreadable and yields `None`.
pub fn parse_coach_reply(body: &Value) -> Option<String> {
    let text = match body {
        Value::Object(fields) => fields
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(inner @ Value::Object(_)) => parse_coach_reply(&inner),
            _ => Some(raw.clone()),
        },
        _ => None,
    };
    text.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
