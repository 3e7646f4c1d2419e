//! Project-specific utilities live here.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:script|style)[^>]*>.*?</(?:script|style)\s*>").expect("valid pattern")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid pattern"));
static OCTET: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Reduce untrusted input to a single line of plain text: markup is
/// stripped, percent-encoded octets are dropped, whitespace is collapsed.
pub fn sanitize_text_field(raw: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(raw, "");
    let text = TAG.replace_all(&text, "");
    let mut text = text.into_owned();
    // Removing one octet can expose another ("%2%41").
    while OCTET.is_match(&text) {
        text = OCTET.replace_all(&text, "").into_owned();
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Sanitized value of an optional request parameter, or `None` when it is
/// missing, blank, or the `"0"` "all" sentinel submitted by the dropdowns.
pub fn present(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize_text_field)
        .filter(|value| !value.is_empty() && value != "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_scripts() {
        assert_eq!(
            sanitize_text_field("<b>Dune</b><script>alert(1)</script>"),
            "Dune"
        );
    }

    #[test]
    fn collapses_whitespace_and_octets() {
        assert_eq!(sanitize_text_field("  the \t\n robots%20of  dawn "), "the robotsof dawn");
        assert_eq!(sanitize_text_field("%%4141x"), "x");
    }

    #[test]
    fn present_treats_blank_and_zero_as_absent() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some("0")), None);
        assert_eq!(present(Some(" asimov ")), Some("asimov".to_string()));
        assert_eq!(present(Some("10")), Some("10".to_string()));
    }
}
