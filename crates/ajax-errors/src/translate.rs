//! Field name translation.

/// Turn a snake_case key into Title Case words: `start_date` → `Start Date`.
pub fn default_key_translate(key: &str) -> String {
    key.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_snake_case() {
        assert_eq!(default_key_translate("start_date"), "Start Date");
        assert_eq!(default_key_translate("required_in_status"), "Required In Status");
    }

    #[test]
    fn test_translate_single_word() {
        assert_eq!(default_key_translate("age"), "Age");
    }

    #[test]
    fn test_translate_keeps_rest_of_word() {
        assert_eq!(default_key_translate("pdDocument_ID"), "PdDocument ID");
    }

    #[test]
    fn test_translate_empty_parts() {
        assert_eq!(default_key_translate(""), "");
        assert_eq!(default_key_translate("a__b"), "A  B");
    }
}
