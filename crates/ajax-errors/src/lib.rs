//! Server error payload normalization.
//!
//! Backends report failures in many shapes: a bare string, `{"error": ..}`,
//! `{"errors": [..]}`, `{"non_field_errors": [..]}`, typed errors carrying a
//! `code`, or a map of field names to messages. This crate flattens all of
//! them into an ordered list of human-readable lines.
//!
//! # Example
//!
//! ```rust
//! use ajax_errors::normalize;
//! use serde_json::json;
//!
//! let lines = normalize(&json!({"age": ["too young", "must be adult"]}));
//! assert_eq!(lines, vec!["Field Age: ", " too young", " must be adult"]);
//! ```

mod envelope;
mod node;
mod normalize;
mod translate;

pub use envelope::{
    format_server_error_as_text, format_server_error_as_text_with, try_get_response_error, ErrorEnvelope,
    FormattedError, FILE_TOO_LARGE_MESSAGE, GLOBAL_ERROR_MESSAGE,
};
pub use node::{ErrorNode, ErrorsEntry, FieldError, FieldValue, TypedError};
pub use normalize::{normalize, normalize_with, ErrorNormalizer, REQUIRED_IN_STATUS};
pub use translate::default_key_translate;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{format_server_error_as_text, normalize, ErrorEnvelope, ErrorNormalizer, FormattedError};
}
