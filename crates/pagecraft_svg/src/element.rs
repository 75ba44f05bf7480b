//! Owned SVG element tree
//!
//! A minimal structural model of glyph markup: elements with ordered
//! attributes and child elements. Text content is not part of the model.

use std::path::Path;

use crate::error::SvgError;
use crate::markup::{close_tag, open_tag, SVG_NS};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An SVG element with its attributes (in document order) and children
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Parse markup into an element tree
    ///
    /// The document root gets an explicit `xmlns` attribute when it lives in
    /// the SVG namespace, and `xmlns:xlink` when any `xlink:` attribute is
    /// present, so that parsing and re-serializing is lossless.
    pub fn parse(markup: &str) -> Result<Self, SvgError> {
        let doc = roxmltree::Document::parse(markup)?;
        let root = doc.root_element();
        let mut element = convert(root)?;

        let mut declarations = Vec::new();
        if root.tag_name().namespace() == Some(SVG_NS) {
            declarations.push(("xmlns".to_string(), SVG_NS.to_string()));
        }
        // `xlink:` attributes need their prefix declared to parse back
        let uses_xlink = element
            .descendants()
            .any(|e| e.attrs.iter().any(|(n, _)| n.starts_with("xlink:")));
        if uses_xlink {
            declarations.push(("xmlns:xlink".to_string(), XLINK_NS.to_string()));
        }
        declarations.append(&mut element.attrs);
        element.attrs = declarations;

        Ok(element)
    }

    /// Load and parse an SVG file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SvgError> {
        let markup = std::fs::read_to_string(path)?;
        Self::parse(&markup)
    }

    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The element's `id`, if any
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Iterate over this element and all of its descendants, depth first
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Find the first element (self included) carrying the given id
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants().find(|e| e.id() == Some(id))
    }

    /// Serialize the tree to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    /// Serialize the tree, appending to `out`
    pub fn write_markup(&self, out: &mut String) {
        let attrs = self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()));
        if self.children.is_empty() {
            open_tag(out, &self.tag, attrs, true);
        } else {
            open_tag(out, &self.tag, attrs, false);
            for child in &self.children {
                child.write_markup(out);
            }
            close_tag(out, &self.tag);
        }
    }
}

/// Depth-first iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> Result<Element, SvgError> {
    let mut element = Element::new(node.tag_name().name());

    for attr in node.attributes() {
        let name = match attr.namespace() {
            None => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(XML_NS) => format!("xml:{}", attr.name()),
            Some(ns) => {
                return Err(SvgError::Unsupported(format!(
                    "attribute `{}` in namespace {}",
                    attr.name(),
                    ns
                )))
            }
        };
        element.attrs.push((name, attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(convert(child)?);
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !text.trim().is_empty() {
                return Err(SvgError::Unsupported(format!(
                    "text content inside <{}>",
                    element.tag
                )));
            }
        }
    }

    Ok(element)
}
