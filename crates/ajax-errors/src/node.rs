//! Classification of raw error payloads.

use serde_json::{Map, Value};

/// A server error payload, classified by shape.
///
/// [`ErrorNode::from_value`] applies the shape rules in a fixed priority
/// order; when an object matches several shapes the first rule wins:
///
/// 1. falsy (`null`, `false`, `0`, `""`) → [`ErrorNode::Empty`]
/// 2. string → [`ErrorNode::Message`]
/// 3. array → [`ErrorNode::List`]
/// 4. object with a non-empty string `error` → [`ErrorNode::Error`]
/// 5. object with an array `errors` → [`ErrorNode::Errors`]
/// 6. object with an array `non_field_errors` → [`ErrorNode::NonFieldErrors`]
/// 7. object with a truthy `code` → [`ErrorNode::Typed`]
/// 8. any other object → [`ErrorNode::Fields`]
/// 9. anything else → [`ErrorNode::Empty`]
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorNode {
    Empty,
    Message(String),
    List(Vec<ErrorNode>),
    Error(String),
    Errors(Vec<ErrorsEntry>),
    NonFieldErrors(Vec<String>),
    Typed(TypedError),
    Fields(Vec<FieldError>),
}

/// One item of an `errors` array.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorsEntry {
    Message(String),
    /// The values of an object entry, in field order.
    Values(Vec<String>),
}

/// An error identified by a machine-readable `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedError {
    pub code: String,
    /// Field names from `extra.fields`.
    pub fields: Vec<String>,
    pub description: Option<String>,
}

/// One entry of a field → error map.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Message(String),
    List(Vec<ErrorNode>),
    Nested(Vec<(String, ErrorNode)>),
    /// `null`, numbers and booleans carry no message.
    Ignored,
}

impl ErrorNode {
    /// Classify a raw payload.
    pub fn from_value(value: &Value) -> Self {
        if is_falsy(value) {
            return Self::Empty;
        }

        match value {
            Value::String(message) => Self::Message(message.clone()),
            Value::Array(items) => Self::List(list_items(items)),
            Value::Object(object) => classify_object(object),
            _ => Self::Empty,
        }
    }
}

fn classify_object(object: &Map<String, Value>) -> ErrorNode {
    if let Some(Value::String(error)) = object.get("error") {
        if !error.is_empty() {
            return ErrorNode::Error(error.clone());
        }
    }

    if let Some(Value::Array(errors)) = object.get("errors") {
        return ErrorNode::Errors(errors.iter().filter_map(errors_entry).collect());
    }

    if let Some(Value::Array(errors)) = object.get("non_field_errors") {
        return ErrorNode::NonFieldErrors(errors.iter().map(display).collect());
    }

    if let Some(code) = object.get("code").filter(|code| !is_falsy(code)) {
        return ErrorNode::Typed(typed_error(code, object));
    }

    ErrorNode::Fields(
        object
            .iter()
            .map(|(field, value)| FieldError {
                field: field.clone(),
                value: field_value(value),
            })
            .collect(),
    )
}

/// Array elements: strings are kept verbatim (even empty ones), anything
/// else is classified recursively.
fn list_items(items: &[Value]) -> Vec<ErrorNode> {
    items
        .iter()
        .map(|item| match item {
            Value::String(message) => ErrorNode::Message(message.clone()),
            other => ErrorNode::from_value(other),
        })
        .collect()
}

fn errors_entry(entry: &Value) -> Option<ErrorsEntry> {
    match entry {
        Value::Null => None,
        Value::Array(items) => Some(ErrorsEntry::Values(items.iter().map(display).collect())),
        Value::Object(object) => Some(ErrorsEntry::Values(
            object
                .values()
                .flat_map(|value| match value {
                    Value::Array(items) => items.iter().map(display).collect(),
                    other => vec![display(other)],
                })
                .collect(),
        )),
        other => Some(ErrorsEntry::Message(display(other))),
    }
}

fn typed_error(code: &Value, object: &Map<String, Value>) -> TypedError {
    let fields = object
        .get("extra")
        .and_then(|extra| extra.get("fields"))
        .and_then(Value::as_array)
        .map(|fields| fields.iter().map(display).collect())
        .unwrap_or_default();

    let description = object
        .get("description")
        .filter(|description| !is_falsy(description))
        .map(display);

    TypedError {
        code: display(code),
        fields,
        description,
    }
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::String(message) => FieldValue::Message(message.clone()),
        Value::Array(items) => FieldValue::List(list_items(items)),
        Value::Object(nested) => FieldValue::Nested(
            nested
                .iter()
                .map(|(field, value)| (field.clone(), ErrorNode::from_value(value)))
                .collect(),
        ),
        _ => FieldValue::Ignored,
    }
}

pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Text of a scalar as it would be shown to a user.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
