//! Per-render id scoping
//!
//! Inline SVG shares one id namespace per document. A glyph that defines a
//! `clipPath`, gradient or mask and is rendered twice would otherwise have
//! its second definition silently shadowed by the first. Every render through
//! an [`IdScope`] draws a fresh instance number and rewrites the glyph's ids,
//! and every `url(#..)` / `href="#.."` pointing at them, to `<id>-<n>`.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use pagecraft_svg::markup::format_number;
use pagecraft_svg::url_reference_spans;

use crate::glyph::ViewBox;

static PROCESS_SCOPE: IdScope = IdScope::new();

/// The scope used by [`Glyph::render`](crate::Glyph::render)
pub fn process_scope() -> &'static IdScope {
    &PROCESS_SCOPE
}

/// A namespace in which generated ids are unique
///
/// Ids are unique per scope. Two scopes rendering into the same document
/// must use different prefixes.
#[derive(Debug, Default)]
pub struct IdScope {
    prefix: Option<Cow<'static, str>>,
    next: AtomicU64,
}

impl IdScope {
    pub const fn new() -> Self {
        Self {
            prefix: None,
            next: AtomicU64::new(0),
        }
    }

    /// A scope whose ids read `<prefix>-<id>-<n>`
    pub fn with_prefix(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            next: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Reserve the next instance number
    pub fn next_instance(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id `base` takes in render instance `instance`
    pub fn scoped_id(&self, base: &str, instance: u64) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}-{base}-{instance}"),
            None => format!("{base}-{instance}"),
        }
    }

    pub(crate) fn id_map(&self, ids: &'static [&'static str]) -> IdMap {
        if ids.is_empty() {
            return IdMap::identity();
        }
        let instance = self.next_instance();
        IdMap {
            pairs: ids
                .iter()
                .map(|id| (*id, self.scoped_id(id, instance)))
                .collect(),
        }
    }
}

/// Mapping from a glyph's declared ids to the ids of one render instance
pub(crate) struct IdMap {
    pairs: Vec<(&'static str, String)>,
}

impl IdMap {
    pub(crate) fn identity() -> Self {
        Self { pairs: Vec::new() }
    }

    pub(crate) fn is_identity(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn generated(&self) -> Vec<String> {
        self.pairs.iter().map(|(_, id)| id.clone()).collect()
    }

    fn lookup(&self, id: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(old, _)| *old == id)
            .map(|(_, new)| new.as_str())
    }

    /// Rewrite one attribute value for this instance
    pub(crate) fn rewrite<'a>(&self, name: &str, value: &'a str) -> Cow<'a, str> {
        if self.pairs.is_empty() {
            return Cow::Borrowed(value);
        }

        match name {
            "id" => {
                if let Some(new) = self.lookup(value) {
                    return Cow::Owned(new.to_string());
                }
            }
            "href" | "xlink:href" => {
                if let Some(new) = value.strip_prefix('#').and_then(|id| self.lookup(id)) {
                    return Cow::Owned(format!("#{new}"));
                }
            }
            _ => {}
        }

        // Only the id inside each reference changes; quoting and spacing stay
        let mut rewritten = String::new();
        let mut copied = 0;
        for reference in url_reference_spans(value) {
            if let Some(new) = self.lookup(reference.id) {
                rewritten.push_str(&value[copied..reference.span.start]);
                rewritten.push_str(new);
                copied = reference.span.end;
            }
        }
        if copied == 0 {
            return Cow::Borrowed(value);
        }
        rewritten.push_str(&value[copied..]);
        Cow::Owned(rewritten)
    }
}

/// Size, placement and class applied to the root `<svg>` of a render
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOptions {
    size: Option<f32>,
    position: Option<(f32, f32)>,
    class: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered width; height follows the view box aspect ratio
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Offset inside an enclosing `<svg>`
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub(crate) fn root_attrs(&self, view_box: &ViewBox) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some((x, y)) = self.position {
            attrs.push(("x", format_number(x)));
            attrs.push(("y", format_number(y)));
        }
        if let Some(size) = self.size {
            attrs.push(("width", format_number(size)));
            attrs.push(("height", format_number(view_box.height_for(size))));
        }
        if let Some(class) = &self.class {
            attrs.push(("class", class.clone()));
        }
        attrs
    }
}

/// Markup of one render instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedGlyph {
    name: &'static str,
    markup: String,
    ids: Vec<String>,
}

impl RenderedGlyph {
    pub(crate) fn new(name: &'static str, markup: String, ids: Vec<String>) -> Self {
        Self { name, markup, ids }
    }

    /// Name of the glyph this instance was rendered from
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Ids generated for this instance, in the glyph's declaration order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl fmt::Display for RenderedGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static IDS: &[&str] = &["clip", "fade"];

    #[test]
    fn test_instances_are_monotonic() {
        let scope = IdScope::new();
        assert_eq!(scope.next_instance(), 0);
        assert_eq!(scope.next_instance(), 1);
        assert_eq!(scope.next_instance(), 2);
    }

    #[test]
    fn test_scoped_id_format() {
        assert_eq!(IdScope::new().scoped_id("clip", 3), "clip-3");
        assert_eq!(IdScope::with_prefix("toolbar").scoped_id("clip", 3), "toolbar-clip-3");
    }

    #[test]
    fn test_empty_ids_do_not_consume_instances() {
        let scope = IdScope::new();
        assert!(scope.id_map(&[]).is_identity());
        assert_eq!(scope.next_instance(), 0);
    }

    #[test]
    fn test_rewrite() {
        let scope = IdScope::new();
        let map = scope.id_map(IDS);
        assert_eq!(map.generated(), ["clip-0", "fade-0"]);

        assert_eq!(map.rewrite("id", "clip"), "clip-0");
        assert_eq!(map.rewrite("id", "other"), "other");
        assert_eq!(map.rewrite("href", "#fade"), "#fade-0");
        assert_eq!(map.rewrite("clip-path", "url(#clip)"), "url(#clip-0)");
        assert_eq!(map.rewrite("style", "fill: url(#fade); mask: url(#clip)"), "fill: url(#fade-0); mask: url(#clip-0)");
        assert!(matches!(map.rewrite("fill", "currentColor"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_rewrite_quoted_references_keeps_quoting() {
        let scope = IdScope::new();
        let map = scope.id_map(IDS);
        assert_eq!(map.rewrite("clip-path", "url('#clip')"), "url('#clip-0')");
        assert_eq!(map.rewrite("fill", r##"url("#fade")"##), r##"url("#fade-0")"##);
        assert_eq!(
            map.rewrite("style", r##"mask: url( "#clip" ); fill: url(#other)"##),
            r##"mask: url( "#clip-0" ); fill: url(#other)"##
        );
    }

    #[test]
    fn test_rewrite_matches_whole_ids_only() {
        let scope = IdScope::new();
        let map = scope.id_map(&["c"]);
        assert_eq!(map.rewrite("clip-path", "url(#clip)"), "url(#clip)");
        assert_eq!(map.rewrite("href", "#clip"), "#clip");
    }

    #[test]
    fn test_concurrent_renders_get_distinct_instances() {
        let scope = IdScope::new();
        let mut seen: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..100).map(|_| scope.next_instance()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 400);
    }
}
