use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Reply fields consulted for the message text, in priority order.
const TEXT_FIELDS: [&str; 2] = ["text", "output"];
const TIMESTAMP_FIELD: &str = "timestamp";

/// A server reply reduced to what the chat view displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedMessage {
    pub text: String,

    /// Server timestamp exactly as received, not reformatted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NormalizedMessage {
    /// Decode a reply of any shape. Fields with the wrong JSON type count as
    /// missing, and non-objects yield an empty message.
    pub fn from_value(response: &Value) -> Self {
        // Indexing a non-object Value yields Null, so no shape check is needed
        let text = TEXT_FIELDS
            .iter()
            .find_map(|field| response[*field].as_str().map(|text| (*field, text)));

        let text = match text {
            Some((field, text)) => {
                if field != TEXT_FIELDS[0] {
                    debug!(field, "Reply has no text field, using fallback");
                }
                text.to_string()
            }
            None => {
                debug!(
                    kind = value_kind(response),
                    "No usable text field in reply, defaulting to empty"
                );
                String::new()
            }
        };

        let timestamp = response[TIMESTAMP_FIELD].as_str().map(str::to_string);

        Self { text, timestamp }
    }
}

/// Normalize an optional reply into `{text, timestamp}`. Never fails.
pub fn extract_text_and_timestamp(response: Option<&Value>) -> NormalizedMessage {
    match response {
        Some(response) => NormalizedMessage::from_value(response),
        None => {
            debug!("No reply to extract from");
            NormalizedMessage::default()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
