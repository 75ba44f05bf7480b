//! Markup serialization
//!
//! The one serializer used for every string form of a glyph. Both the static
//! icon tables and the owned [`Element`](crate::Element) tree write through
//! these functions, so the two representations cannot drift apart.

use std::borrow::Cow;

/// SVG namespace written on every root `<svg>` element
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Escape a string for use inside a double-quoted attribute value
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Write an opening tag
///
/// When `empty` is true the tag is self-closed (`<path .../>`) and no
/// matching [`close_tag`] must follow.
pub fn open_tag<I, N, V>(out: &mut String, tag: &str, attrs: I, empty: bool)
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<str>,
{
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name.as_ref());
        out.push_str("=\"");
        out.push_str(&escape_attr(value.as_ref()));
        out.push('"');
    }
    if empty {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

/// Write a closing tag
pub fn close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Format a number the way glyph markup spells it (`24`, not `24.0`)
pub fn format_number(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
