/// Collapses every run of whitespace to a single space and trims both ends.
///
/// Used for clean hash keys and for comparing source content when deciding
/// whether two resources are instances of each other.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes translatable text for comparison.
///
/// Escaped line breaks and tabs (as written in resource files) count as
/// whitespace too.
pub fn clean_string(text: &str) -> String {
    let mut s = text.to_string();

    for esc in ["\\n", "\\t", "\\r"] {
        s = s.replace(esc, " ");
    }

    collapse_whitespace(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_internal_runs() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn clean_string_treats_escapes_as_space() {
        assert_eq!(clean_string("Hello\\nworld"), "Hello world");
        assert_eq!(clean_string("  Hello   world "), "Hello world");
    }
}
