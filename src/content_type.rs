//! Content-Type extraction
//!
//! Splits a Content-Type value into a media type, lower-cased for handler
//! lookup, and the raw parameter string that body handlers receive as
//! context.

use crate::limits::{HTAB, PARAM_SEPARATOR, SP};
use crate::types::ContentType;

/// Split a Content-Type value at its first semicolon
///
/// # Examples
/// ```
/// use msrp_parse::content_type::extract_content_type;
///
/// let ct = extract_content_type("text/plain; charset=utf-8");
/// assert_eq!(ct.media_type, "text/plain");
/// assert_eq!(ct.parameters.as_deref(), Some("charset=utf-8"));
///
/// let bare = extract_content_type("Message/CPIM");
/// assert_eq!(bare.media_type, "message/cpim");
/// assert_eq!(bare.parameters, None);
/// ```
pub fn extract_content_type(raw_value: &str) -> ContentType {
    match raw_value.split_once(PARAM_SEPARATOR as char) {
        Some((media_type, parameters)) => {
            let parameters = parameters.trim_start_matches(|c: char| c == SP as char || c == HTAB as char);
            ContentType {
                media_type: media_type.to_ascii_lowercase(),
                parameters: (!parameters.is_empty()).then(|| parameters.to_string()),
            }
        }
        None => ContentType {
            media_type: raw_value.to_ascii_lowercase(),
            parameters: None,
        },
    }
}

impl ContentType {
    /// Whether the media type is empty, e.g. for a value starting with `;`
    pub fn is_degenerate(&self) -> bool {
        self.media_type.is_empty()
    }

    /// Media type usable for handler lookup, `None` when degenerate
    pub fn lookup_key(&self) -> Option<&str> {
        (!self.is_degenerate()).then_some(self.media_type.as_str())
    }

    /// Look up a single parameter, e.g. `charset`
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .as_deref()
            .and_then(|params| extract_parameter(params, name))
    }
}

/// Extract a parameter value from a `name=value; name=value` string
///
/// Names compare ignoring ASCII case and quoted values are unquoted.
///
/// # Examples
/// ```
/// use msrp_parse::content_type::extract_parameter;
///
/// assert_eq!(extract_parameter("charset=\"UTF-8\"; format=flowed", "CHARSET"), Some("UTF-8"));
/// assert_eq!(extract_parameter("format=flowed", "charset"), None);
/// ```
pub fn extract_parameter<'a>(parameters: &'a str, name: &str) -> Option<&'a str> {
    parameters.split(PARAM_SEPARATOR as char).find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case(name) {
            return None;
        }
        let value = value.trim();
        if value.len() > 1 && value.starts_with('"') && value.ends_with('"') {
            Some(&value[1..value.len() - 1])
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_parameters() {
        let ct = extract_content_type("text/plain; charset=utf-8");
        assert_eq!(ct.media_type, "text/plain");
        assert_eq!(ct.parameters.as_deref(), Some("charset=utf-8"));
        assert_eq!(ct.parameter("charset"), Some("utf-8"));
    }

    #[test]
    fn test_split_without_parameters() {
        let ct = extract_content_type("text/plain");
        assert_eq!(ct.media_type, "text/plain");
        assert_eq!(ct.parameters, None);
        assert_eq!(ct.parameter("charset"), None);
    }

    #[test]
    fn test_media_type_is_lower_cased_only() {
        let ct = extract_content_type("Text/HTML;\t Charset=ISO-8859-1");
        assert_eq!(ct.media_type, "text/html");
        assert_eq!(ct.parameters.as_deref(), Some("Charset=ISO-8859-1"));
        assert_eq!(ct.parameter("charset"), Some("ISO-8859-1"));
    }

    #[test]
    fn test_media_type_is_not_trimmed() {
        let ct = extract_content_type("text/plain ; charset=utf-8");
        assert_eq!(ct.media_type, "text/plain ");
    }

    #[test]
    fn test_degenerate_values() {
        let leading = extract_content_type(";charset=utf-8");
        assert!(leading.is_degenerate());
        assert_eq!(leading.lookup_key(), None);
        assert_eq!(leading.parameters.as_deref(), Some("charset=utf-8"));

        let empty = extract_content_type("");
        assert!(empty.is_degenerate());
        assert_eq!(empty.parameters, None);

        let trailing = extract_content_type("text/plain;  ");
        assert_eq!(trailing.lookup_key(), Some("text/plain"));
        assert_eq!(trailing.parameters, None);
    }

    #[test]
    fn test_extract_parameter_variants() {
        let params = "boundary=\"simple boundary\"; charset=us-ascii; flag";
        assert_eq!(extract_parameter(params, "boundary"), Some("simple boundary"));
        assert_eq!(extract_parameter(params, "charset"), Some("us-ascii"));
        assert_eq!(extract_parameter(params, "flag"), None);
        assert_eq!(extract_parameter("", "charset"), None);
    }
}
