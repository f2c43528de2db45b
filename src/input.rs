use crate::mcp::errors;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct InputError {
    pub kind: &'static str,
    pub message: String,
    /// Longer explanation shown to the caller in place of `message`.
    pub hint: Option<String>,
}

impl InputError {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: errors::INVALID_INPUT,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn display_message(&self) -> &str {
        self.hint.as_deref().unwrap_or(&self.message)
    }
}

pub fn arguments(args: &Value) -> Result<&Map<String, Value>, InputError> {
    args.as_object()
        .ok_or_else(|| InputError::invalid_input("arguments must be an object"))
}

pub fn required_str(args: &Map<String, Value>, name: &str) -> Result<String, InputError> {
    optional_str(args, name)?
        .ok_or_else(|| InputError::invalid_input(format!("{name} is required")))
}

/// Missing, null and blank strings all read as absent. Numbers are accepted
/// so that versions may be passed either way.
pub fn optional_str(args: &Map<String, Value>, name: &str) -> Result<Option<String>, InputError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(_) => Err(InputError::invalid_input(format!(
            "{name} must be a string"
        ))),
    }
}

/// Reads an argument carrying JSON. Strings are parsed; objects and arrays
/// are taken as already decoded.
pub fn optional_json(args: &Map<String, Value>, name: &str) -> Result<Option<Value>, InputError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => serde_json::from_str(text).map(Some).map_err(|_| {
            InputError::invalid_input(format!("Invalid JSON format for {name}")).with_hint(
                format!("Failed to parse {name} JSON. Please ensure it's valid JSON format."),
            )
        }),
        Some(value @ (Value::Object(_) | Value::Array(_))) => Ok(Some(value.clone())),
        Some(_) => Err(InputError::invalid_input(format!(
            "{name} must be a JSON string"
        ))),
    }
}

pub fn required_json(args: &Map<String, Value>, name: &str) -> Result<Value, InputError> {
    optional_json(args, name)?
        .ok_or_else(|| InputError::invalid_input(format!("{name} is required")))
}

pub fn expect_object(name: &str, value: Value) -> Result<Map<String, Value>, InputError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(
            InputError::invalid_input(format!("Invalid {name} format"))
                .with_hint(format!("{name} must be a JSON object")),
        ),
    }
}
