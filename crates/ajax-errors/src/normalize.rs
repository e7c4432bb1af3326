//! Flattening of classified errors into display lines.

use serde_json::Value;

use crate::node::{ErrorNode, ErrorsEntry, FieldError, FieldValue, TypedError};
use crate::translate::default_key_translate;

/// Code of the typed error listing fields required in the current status.
pub const REQUIRED_IN_STATUS: &str = "required_in_status";

/// Prefix marking a line as nested under the preceding header line.
const NESTED_MARKER: &str = " ";

/// Turns error payloads into ordered display lines.
///
/// Field names are passed through a translator before being shown; the
/// default one turns `snake_case` into `Title Case`. Normalization never
/// fails: an unrecognized payload yields no lines.
#[derive(Debug, Clone, Copy)]
pub struct ErrorNormalizer<T = fn(&str) -> String> {
    translate: T,
}

impl ErrorNormalizer {
    /// Normalizer using [`default_key_translate`].
    pub fn new() -> Self {
        Self {
            translate: default_key_translate,
        }
    }
}

impl Default for ErrorNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ErrorNormalizer<T>
where
    T: Fn(&str) -> String,
{
    /// Normalizer using a custom field-name translator.
    pub fn with_translator(translate: T) -> Self {
        Self { translate }
    }

    /// Flatten a raw payload.
    pub fn normalize(&self, payload: &Value) -> Vec<String> {
        self.normalize_node(&ErrorNode::from_value(payload))
    }

    /// Flatten an already classified payload.
    pub fn normalize_node(&self, node: &ErrorNode) -> Vec<String> {
        match node {
            ErrorNode::Empty => Vec::new(),
            ErrorNode::Message(message) => vec![message.clone()],
            ErrorNode::List(items) => items.iter().flat_map(|item| self.normalize_node(item)).collect(),
            ErrorNode::Error(error) => vec![error.clone()],
            ErrorNode::Errors(entries) => entries
                .iter()
                .flat_map(|entry| match entry {
                    ErrorsEntry::Message(message) => vec![message.clone()],
                    ErrorsEntry::Values(values) => values.clone(),
                })
                .collect(),
            ErrorNode::NonFieldErrors(errors) => errors.clone(),
            ErrorNode::Typed(typed) => self.typed(typed),
            ErrorNode::Fields(fields) => fields.iter().flat_map(|field| self.field(field)).collect(),
        }
    }

    fn typed(&self, typed: &TypedError) -> Vec<String> {
        if typed.code == REQUIRED_IN_STATUS {
            let fields = typed
                .fields
                .iter()
                .map(|field| (self.translate)(field))
                .collect::<Vec<_>>()
                .join(", ");
            return vec![format!("{}: {}", (self.translate)(REQUIRED_IN_STATUS), fields)];
        }

        typed.description.iter().cloned().collect()
    }

    fn field(&self, error: &FieldError) -> Vec<String> {
        let field = (self.translate)(&error.field);

        match &error.value {
            FieldValue::Message(message) => vec![format!("Field {field} - {message}")],
            FieldValue::List(items) => {
                let header = format!("Field {field}: ");
                let mut lines: Vec<String> = items.iter().flat_map(|item| self.normalize_node(item)).collect();

                if lines.len() == 1 {
                    return vec![format!("{header}{}", lines.remove(0))];
                }

                std::iter::once(header)
                    .chain(lines.into_iter().map(|line| format!("{NESTED_MARKER}{line}")))
                    .collect()
            }
            FieldValue::Nested(entries) => entries
                .iter()
                .map(|(nested_field, nested)| {
                    format!(
                        "Field {field} ({}) - {}",
                        (self.translate)(nested_field),
                        self.normalize_node(nested).join(",")
                    )
                })
                .collect(),
            FieldValue::Ignored => Vec::new(),
        }
    }
}

/// Flatten `payload` with the default field-name translator.
pub fn normalize(payload: &Value) -> Vec<String> {
    ErrorNormalizer::new().normalize(payload)
}

/// Flatten `payload`, translating field names with `translate`.
pub fn normalize_with<T>(payload: &Value, translate: T) -> Vec<String>
where
    T: Fn(&str) -> String,
{
    ErrorNormalizer::with_translator(translate).normalize(payload)
}
