//! Structural validation of glyph markup
//!
//! Checks the properties every glyph in a table must satisfy: a `<svg>` root
//! with a four-number `viewBox`, numeric attributes that parse as numbers,
//! unique ids, and no references to undefined ids.

use std::collections::HashSet;
use std::ops::Range;

use crate::element::Element;
use crate::error::SvgError;

/// Attributes whose value must be a single number, optionally with a unit
const NUMERIC_ATTRS: &[&str] = &[
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "fx",
    "fy",
    "x1",
    "y1",
    "x2",
    "y2",
    "width",
    "height",
    "offset",
    "opacity",
    "fill-opacity",
    "stroke-opacity",
    "stop-opacity",
    "stroke-width",
    "stroke-miterlimit",
    "stroke-dashoffset",
];

/// Attributes whose value is a list of numbers
const NUMBER_LIST_ATTRS: &[&str] = &["points", "stroke-dasharray"];

/// Parse a `viewBox` value into `[min_x, min_y, width, height]`
pub fn parse_view_box(value: &str) -> Option<[f32; 4]> {
    let numbers = parse_number_list(value)?;
    match numbers.as_slice() {
        &[x, y, w, h] if w > 0.0 && h > 0.0 => Some([x, y, w, h]),
        _ => None,
    }
}

/// Parse a length such as `24`, `1.5px` or `50%`
pub fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value
        .strip_suffix('%')
        .or_else(|| value.strip_suffix("px"))
        .unwrap_or(value);
    number.parse::<f32>().ok().filter(|n| n.is_finite())
}

fn parse_number_list(value: &str) -> Option<Vec<f32>> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().ok().filter(|n| n.is_finite()))
        .collect()
}

/// A `url(#id)` reference inside an attribute value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlReference<'a> {
    pub id: &'a str,
    /// Byte range of `id` within the scanned value
    pub span: Range<usize>,
}

/// Every `url(#id)` reference in a value, including the quoted forms
/// `url("#id")` and `url('#id')`
pub fn url_reference_spans(value: &str) -> Vec<UrlReference<'_>> {
    let mut refs = Vec::new();
    let mut offset = 0;
    while let Some(found) = value[offset..].find("url(") {
        offset += found + 4;
        if let Some((span, end)) = parse_url_target(value.as_bytes(), offset) {
            refs.push(UrlReference {
                id: &value[span.clone()],
                span,
            });
            offset = end;
        }
    }
    refs
}

/// Ids referenced by an attribute value through `url(#id)`
pub fn url_references(value: &str) -> Vec<&str> {
    url_reference_spans(value).into_iter().map(|r| r.id).collect()
}

/// Parse `[ws] [quote] #id [quote] [ws] )` starting right after `url(`.
/// Returns the id span and the offset after the closing parenthesis.
fn parse_url_target(bytes: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let skip_ws = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        i
    };

    let mut i = skip_ws(start);
    let quote = match bytes.get(i) {
        Some(&q @ (b'"' | b'\'')) => {
            i += 1;
            Some(q)
        }
        _ => None,
    };
    if bytes.get(i) != Some(&b'#') {
        return None;
    }
    i += 1;

    let id_start = i;
    while let Some(&b) = bytes.get(i) {
        let stop = match quote {
            Some(q) => b == q,
            None => b == b')' || b.is_ascii_whitespace(),
        };
        if stop {
            break;
        }
        i += 1;
    }
    let id_end = i;
    if id_end == id_start {
        return None;
    }

    if let Some(q) = quote {
        if bytes.get(i) != Some(&q) {
            return None;
        }
        i += 1;
    }
    i = skip_ws(i);
    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some((id_start..id_end, i + 1))
}

/// All ids an element references, from `url(#..)` values and `href="#.."`
pub fn element_references(element: &Element) -> Vec<&str> {
    let mut refs = Vec::new();
    for (name, value) in &element.attrs {
        if name == "href" || name == "xlink:href" {
            if let Some(id) = value.strip_prefix('#') {
                refs.push(id);
            }
        } else {
            refs.extend(url_references(value));
        }
    }
    refs
}

/// Ids defined anywhere in the tree, in document order
pub fn defined_ids(root: &Element) -> Vec<&str> {
    root.descendants().filter_map(Element::id).collect()
}

/// Ids defined more than once in the tree, each reported once
pub fn duplicate_ids(root: &Element) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for id in defined_ids(root) {
        if !seen.insert(id) && reported.insert(id) {
            duplicates.push(id.to_string());
        }
    }
    duplicates
}

/// Referenced ids with no matching definition in the tree
pub fn dangling_references(root: &Element) -> Vec<String> {
    let defined: HashSet<&str> = defined_ids(root).into_iter().collect();
    let mut dangling = Vec::new();
    for element in root.descendants() {
        for id in element_references(element) {
            if !defined.contains(id) && !dangling.iter().any(|d| d == id) {
                dangling.push(id.to_string());
            }
        }
    }
    dangling
}

/// Validate an element tree as a standalone glyph
pub fn validate_glyph(root: &Element) -> Result<(), SvgError> {
    if root.tag != "svg" {
        return Err(SvgError::Parse(format!(
            "root element must be <svg>, found <{}>",
            root.tag
        )));
    }

    let view_box = root.attr("viewBox").unwrap_or_default();
    if parse_view_box(view_box).is_none() {
        return Err(invalid(root, "viewBox", view_box));
    }

    for element in root.descendants() {
        for (name, value) in &element.attrs {
            let name = name.as_str();
            if NUMERIC_ATTRS.contains(&name) && parse_length(value).is_none() {
                return Err(invalid(element, name, value));
            }
            if NUMBER_LIST_ATTRS.contains(&name)
                && value != "none"
                && parse_number_list(value).map_or(true, |n| n.is_empty())
            {
                return Err(invalid(element, name, value));
            }
        }
    }

    if let Some(id) = duplicate_ids(root).into_iter().next() {
        return Err(SvgError::DuplicateId(id));
    }
    if let Some(id) = dangling_references(root).into_iter().next() {
        return Err(SvgError::DanglingReference(id));
    }

    Ok(())
}

/// Load and validate a glyph file
pub fn validate_file(path: impl AsRef<std::path::Path>) -> Result<Element, SvgError> {
    let root = Element::from_file(path)?;
    validate_glyph(&root)?;
    Ok(root)
}

/// Parse and validate glyph markup in one step
pub fn validate_markup(markup: &str) -> Result<Element, SvgError> {
    let root = Element::parse(markup)?;
    validate_glyph(&root)?;
    Ok(root)
}

fn invalid(element: &Element, attribute: &str, value: &str) -> SvgError {
    SvgError::InvalidAttribute {
        element: element.tag.clone(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_box() {
        assert_eq!(parse_view_box("0 0 24 24"), Some([0.0, 0.0, 24.0, 24.0]));
        assert_eq!(parse_view_box("0,0,16,16"), Some([0.0, 0.0, 16.0, 16.0]));
        assert_eq!(parse_view_box("0 0 24"), None);
        assert_eq!(parse_view_box("0 0 0 24"), None);
    }

    #[test]
    fn test_lengths() {
        assert_eq!(parse_length("1.5"), Some(1.5));
        assert_eq!(parse_length("50%"), Some(50.0));
        assert_eq!(parse_length("12px"), Some(12.0));
        assert_eq!(parse_length("wide"), None);
    }

    #[test]
    fn test_url_references() {
        assert_eq!(url_references("url(#a)"), ["a"]);
        assert_eq!(url_references("url(#a) url(\"#b\")"), ["a", "b"]);
        assert_eq!(url_references("fill: url('#c'); mask: url( #d )"), ["c", "d"]);
        assert!(url_references("currentColor").is_empty());
        assert!(url_references("url(image.png) url(#) url(\"#open)").is_empty());
    }

    #[test]
    fn test_url_reference_spans_point_at_ids() {
        let value = r##"url("#fade") url('#clip')"##;
        let spans: Vec<_> = url_reference_spans(value)
            .into_iter()
            .map(|r| (r.id, &value[r.span]))
            .collect();
        assert_eq!(spans, [("fade", "fade"), ("clip", "clip")]);
    }

    #[test]
    fn test_quoted_dangling_reference_is_rejected() {
        for reference in [r#"url('#missing')"#, "url(&quot;#missing&quot;)"] {
            let svg = format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><g clip-path="{reference}"/></svg>"#
            );
            assert!(matches!(
                validate_markup(&svg),
                Err(SvgError::DanglingReference(id)) if id == "missing"
            ));
        }
    }

    #[test]
    fn test_valid_glyph() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><defs><linearGradient id="g"><stop offset="0"/><stop offset="100%"/></linearGradient></defs><rect width="24" height="24" fill="url(#g)"/><polyline points="1 2, 3 4"/></svg>"#;
        assert!(validate_markup(svg).is_ok());
    }

    #[test]
    fn test_missing_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#;
        assert!(matches!(
            validate_markup(svg),
            Err(SvgError::InvalidAttribute { attribute, .. }) if attribute == "viewBox"
        ));
    }

    #[test]
    fn test_non_numeric_attribute() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="twelve" cy="12" r="4"/></svg>"#;
        assert!(matches!(
            validate_markup(svg),
            Err(SvgError::InvalidAttribute { attribute, .. }) if attribute == "cx"
        ));
    }

    #[test]
    fn test_duplicate_and_dangling_ids() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><clipPath id="c"/><clipPath id="c"/><g clip-path="url(#missing)"/></svg>"#;
        let tree = Element::parse(svg).unwrap();
        assert_eq!(duplicate_ids(&tree), ["c"]);
        assert_eq!(dangling_references(&tree), ["missing"]);
        assert!(matches!(validate_glyph(&tree), Err(SvgError::DuplicateId(id)) if id == "c"));
    }
}
