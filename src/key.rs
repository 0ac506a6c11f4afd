// Cache key syntax helpers.
// Keys are opaque strings that may encode a leading type tag and payload
// segments joined by an `@` delimiter.

/// Delimiter between segments of an encoded cache key.
pub const KEY_DELIMITER: char = '@';

/// Leading tag marking an entry that holds an error.
pub const ERROR_TAG: &str = "err";

/// Leading tag marking an entry produced from a multi-argument invocation.
pub const MULTI_ARG_TAG: &str = "arg";

/// Separator used when joining segments into a human label.
const LABEL_SEPARATOR: &str = ", ";

/// Split a key into its segments.
///
/// Total: a key without the delimiter yields a single segment, and
/// `parse_key(k).join("@")` reproduces `k` exactly.
pub fn parse_key(key: &str) -> Vec<&str> {
    key.split(KEY_DELIMITER).collect()
}

/// A key in either raw string form or pre-parsed segment form, so the
/// classification helpers work without re-parsing at every call site.
#[derive(Clone, Copy)]
pub enum KeyForm<'a> {
    Raw(&'a str),
    Parsed(&'a [&'a str]),
}

impl<'a> KeyForm<'a> {
    fn first_segment(&self) -> &'a str {
        match self {
            KeyForm::Raw(key) => key.split(KEY_DELIMITER).next().unwrap_or(""),
            KeyForm::Parsed(segments) => segments.first().copied().unwrap_or(""),
        }
    }
}

impl<'a> From<&'a str> for KeyForm<'a> {
    fn from(key: &'a str) -> Self {
        KeyForm::Raw(key)
    }
}

impl<'a> From<&'a String> for KeyForm<'a> {
    fn from(key: &'a String) -> Self {
        KeyForm::Raw(key.as_str())
    }
}

impl<'a> From<&'a [&'a str]> for KeyForm<'a> {
    fn from(segments: &'a [&'a str]) -> Self {
        KeyForm::Parsed(segments)
    }
}

impl<'a> From<&'a Vec<&'a str>> for KeyForm<'a> {
    fn from(segments: &'a Vec<&'a str>) -> Self {
        KeyForm::Parsed(segments.as_slice())
    }
}

/// True iff the key's first segment is the error tag.
pub fn is_error_key<'a>(key: impl Into<KeyForm<'a>>) -> bool {
    key.into().first_segment() == ERROR_TAG
}

/// True iff the key's first segment is the multi-argument tag.
pub fn is_array_key<'a>(key: impl Into<KeyForm<'a>>) -> bool {
    key.into().first_segment() == MULTI_ARG_TAG
}

/// Human-readable label for a parsed key.
///
/// Drops the leading tag segment for error and multi-argument keys,
/// then joins the rest with ", ".
pub fn serialize_key(segments: &[&str]) -> String {
    if is_error_key(segments) || is_array_key(segments) {
        segments[1..].join(LABEL_SEPARATOR)
    } else {
        segments.join(LABEL_SEPARATOR)
    }
}

/// Key under which the cache records a failed refetch for `key`.
pub fn error_key_for(key: &str) -> String {
    format!("{}{}{}", ERROR_TAG, KEY_DELIMITER, key)
}

/// A cache key decoded into its tagged form.
///
/// The flat string encoding exists only at the cache boundary; past it
/// the panel works on this variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedKey<'a> {
    /// No recognized tag; every segment is payload.
    Plain(Vec<&'a str>),
    /// `err`-tagged: the entry holds an error for the payload key.
    Error(Vec<&'a str>),
    /// `arg`-tagged: the entry came from a multi-argument invocation.
    MultiArg(Vec<&'a str>),
}

impl<'a> ParsedKey<'a> {
    /// Decode a raw key. Total: anything without a recognized tag is
    /// `Plain`.
    pub fn decode(key: &'a str) -> Self {
        let segments = parse_key(key);
        match segments.first().copied() {
            Some(ERROR_TAG) => ParsedKey::Error(segments[1..].to_vec()),
            Some(MULTI_ARG_TAG) => ParsedKey::MultiArg(segments[1..].to_vec()),
            _ => ParsedKey::Plain(segments),
        }
    }

    /// Payload segments with the tag stripped.
    pub fn payload(&self) -> &[&'a str] {
        match self {
            ParsedKey::Plain(segments)
            | ParsedKey::Error(segments)
            | ParsedKey::MultiArg(segments) => segments,
        }
    }

    /// Human label, identical to [`serialize_key`] on the raw form.
    pub fn label(&self) -> String {
        self.payload().join(LABEL_SEPARATOR)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ParsedKey::Error(_))
    }

    pub fn is_multi_arg(&self) -> bool {
        matches!(self, ParsedKey::MultiArg(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_is_lossless() {
        for key in ["projects", "project/1", "err@key-error", "arg@key-1@1", "a@@b"] {
            assert_eq!(parse_key(key).join("@"), key);
        }
    }

    #[test]
    fn test_parse_key_without_delimiter() {
        assert_eq!(parse_key("plainkey"), vec!["plainkey"]);
    }

    #[test]
    fn test_is_error_key_raw_and_parsed_agree() {
        for key in ["err@key-error", "arg@key-1@1", "projects", "error@x"] {
            let segments = parse_key(key);
            assert_eq!(is_error_key(key), is_error_key(&segments));
            assert_eq!(is_array_key(key), is_array_key(&segments));
        }
        assert!(is_error_key("err@key-error"));
        assert!(!is_error_key("projects"));
        assert!(is_array_key("arg@key-1@1"));
        assert!(!is_array_key("err@key-error"));
    }

    #[test]
    fn test_serialize_key_labels() {
        assert_eq!(serialize_key(&["err", "key-error"]), "key-error");
        assert_eq!(serialize_key(&["arg", "key-1", "1"]), "key-1, 1");
        assert_eq!(serialize_key(&["plainkey"]), "plainkey");
        assert_eq!(serialize_key(&["a", "b"]), "a, b");
    }

    #[test]
    fn test_decode_variants() {
        assert_eq!(
            ParsedKey::decode("err@key-error"),
            ParsedKey::Error(vec!["key-error"])
        );
        assert_eq!(
            ParsedKey::decode("arg@key-1@1"),
            ParsedKey::MultiArg(vec!["key-1", "1"])
        );
        assert_eq!(
            ParsedKey::decode("project/1"),
            ParsedKey::Plain(vec!["project/1"])
        );
    }

    #[test]
    fn test_decode_label_matches_serialize_key() {
        for key in ["projects", "err@key-error", "arg@key-1@1", "a@b@c"] {
            assert_eq!(ParsedKey::decode(key).label(), serialize_key(&parse_key(key)));
        }
    }

    #[test]
    fn test_error_key_for() {
        assert_eq!(error_key_for("projects"), "err@projects");
    }
}
