//! Structured glyph definitions
//!
//! A [`Glyph`] is the canonical form of every icon: a view box, the root
//! presentation attributes and a tree of element [`Node`]s, all `'static`.
//! Markup strings are always derived from it through `pagecraft_svg::markup`.

use std::borrow::Cow;

use pagecraft_svg::markup::{close_tag, format_number, open_tag, SVG_NS};
use pagecraft_svg::Element;

use crate::hooks::{custom_properties, StyleHook};
use crate::scope::{process_scope, IdMap, IdScope, RenderOptions, RenderedGlyph};

/// A single attribute on a glyph element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attr {
    pub name: &'static str,
    pub value: &'static str,
}

/// An element inside a glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub tag: &'static str,
    pub attrs: &'static [Attr],
    pub children: &'static [Node],
}

impl Node {
    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&'static str> {
        self.attrs.iter().find(|a| a.name == name).map(|a| a.value)
    }
}

/// The glyph's coordinate system
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    /// The `viewBox` attribute value, e.g. `0 0 24 24`
    pub fn to_attr(&self) -> String {
        format!(
            "{} {} {} {}",
            format_number(self.min_x),
            format_number(self.min_y),
            format_number(self.width),
            format_number(self.height)
        )
    }

    /// Height for a given rendered width, keeping the aspect ratio
    pub fn height_for(&self, width: f32) -> f32 {
        width * self.height / self.width
    }
}

/// An immutable icon definition
#[derive(Debug, PartialEq)]
pub struct Glyph {
    pub(crate) name: &'static str,
    pub(crate) view_box: ViewBox,
    pub(crate) attrs: &'static [Attr],
    pub(crate) children: &'static [Node],
    pub(crate) ids: &'static [&'static str],
}

impl Glyph {
    /// The key this glyph is registered under
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Presentation attributes on the root `<svg>` (e.g. `fill="currentColor"`)
    pub fn attrs(&self) -> &'static [Attr] {
        self.attrs
    }

    pub fn children(&self) -> &'static [Node] {
        self.children
    }

    /// Ids defined inside the glyph, rewritten per render instance
    pub fn ids(&self) -> &'static [&'static str] {
        self.ids
    }

    /// Whether rendering this glyph needs a fresh id per instance
    pub fn has_scoped_ids(&self) -> bool {
        !self.ids.is_empty()
    }

    /// All nodes of the drawing, depth first
    pub fn nodes(&self) -> impl Iterator<Item = &'static Node> {
        let mut stack: Vec<&'static Node> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Whether two glyphs draw exactly the same thing, ignoring their names
    pub fn same_drawing(&self, other: &Glyph) -> bool {
        self.view_box == other.view_box
            && self.attrs == other.attrs
            && self.children == other.children
    }

    /// CSS custom-property hooks this glyph reads, in declaration order of [`StyleHook::ALL`]
    pub fn style_hooks(&self) -> Vec<StyleHook> {
        let values = self
            .attrs
            .iter()
            .chain(self.nodes().flat_map(|n| n.attrs.iter()))
            .map(|a| a.value);

        let mut hooks: Vec<StyleHook> = values
            .flat_map(custom_properties)
            .filter_map(StyleHook::from_property)
            .collect();
        hooks.sort();
        hooks.dedup();
        hooks
    }

    /// Static markup with the glyph's ids verbatim
    ///
    /// Safe to inline once per document. For glyphs with
    /// [scoped ids](Self::has_scoped_ids) that may appear several times, use
    /// [`render`](Self::render) instead.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, &IdMap::identity(), &[]);
        out
    }

    /// The owned element tree equivalent of [`to_markup`](Self::to_markup)
    pub fn to_tree(&self) -> Element {
        let mut root = Element::new("svg")
            .with_attr("xmlns", SVG_NS)
            .with_attr("viewBox", self.view_box.to_attr());
        for attr in self.attrs {
            root = root.with_attr(attr.name, attr.value);
        }
        root.children = self.children.iter().map(node_to_element).collect();
        root
    }

    /// Render one instance using the process-wide id scope
    pub fn render(&self) -> RenderedGlyph {
        self.render_in(process_scope())
    }

    /// Render one instance with ids drawn from `scope`
    pub fn render_in(&self, scope: &IdScope) -> RenderedGlyph {
        self.render_with(scope, &RenderOptions::default())
    }

    /// Render one instance with sizing, placement and class on the root element
    pub fn render_with(&self, scope: &IdScope, options: &RenderOptions) -> RenderedGlyph {
        let ids = scope.id_map(self.ids);
        if !ids.is_identity() {
            tracing::trace!(glyph = self.name, ids = ?ids.generated(), "scoped glyph ids");
        }

        let extra = options.root_attrs(&self.view_box);
        let mut markup = String::new();
        self.write(&mut markup, &ids, &extra);

        RenderedGlyph::new(self.name, markup, ids.generated())
    }

    fn write(&self, out: &mut String, ids: &IdMap, extra: &[(&'static str, String)]) {
        let view_box = self.view_box.to_attr();
        let root_attrs = [("xmlns", Cow::Borrowed(SVG_NS)), ("viewBox", Cow::Owned(view_box))]
            .into_iter()
            .chain(extra.iter().map(|(n, v)| (*n, Cow::Borrowed(v.as_str()))))
            .chain(self.attrs.iter().map(|a| (a.name, ids.rewrite(a.name, a.value))));

        if self.children.is_empty() {
            open_tag(out, "svg", root_attrs, true);
            return;
        }

        open_tag(out, "svg", root_attrs, false);
        for child in self.children {
            write_node(out, child, ids);
        }
        close_tag(out, "svg");
    }
}

fn write_node(out: &mut String, node: &Node, ids: &IdMap) {
    let attrs = node
        .attrs
        .iter()
        .map(|a| (a.name, ids.rewrite(a.name, a.value)));

    if node.children.is_empty() {
        open_tag(out, node.tag, attrs, true);
    } else {
        open_tag(out, node.tag, attrs, false);
        for child in node.children {
            write_node(out, child, ids);
        }
        close_tag(out, node.tag);
    }
}

fn node_to_element(node: &Node) -> Element {
    Element {
        tag: node.tag.to_string(),
        attrs: node
            .attrs
            .iter()
            .map(|a| (a.name.to_string(), a.value.to_string()))
            .collect(),
        children: node.children.iter().map(node_to_element).collect(),
    }
}
