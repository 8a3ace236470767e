//! XML text escaping for wire documents.
//!
//! Titles in browse results come straight from filenames, which may
//! contain any of the XML-reserved characters. The escape set here also
//! covers the whitespace control characters, which some control points
//! reject when they appear literally inside element text.

/// Escape a string for use as XML element text.
///
/// Replaces `& < > " '` with their entity equivalents and `\n \r \t`
/// with numeric character references.
///
/// # Examples
///
/// ```
/// use dircast_common::xml::escape_text;
///
/// assert_eq!(escape_text("Tom & Jerry"), "Tom &amp; Jerry");
/// assert_eq!(escape_text("a<b>c"), "a&lt;b&gt;c");
/// ```
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
    out
}
