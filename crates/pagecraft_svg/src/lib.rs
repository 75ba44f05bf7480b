//! SVG plumbing for pagecraft icons
//!
//! This crate writes, parses, validates and rasterizes glyph markup. It holds
//! the single serializer every string form of a glyph goes through, an owned
//! element tree for structural comparison, and `usvg`/`resvg` based previews.
//!
//! # Example
//!
//! ```
//! use pagecraft_svg::{validate_markup, Element};
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 12h16"/></svg>"#;
//! let tree = validate_markup(svg).unwrap();
//! assert_eq!(tree.to_markup(), svg);
//! assert_eq!(Element::parse(svg).unwrap(), tree);
//! ```

mod color;
mod element;
mod error;
pub mod markup;
mod rasterize;
mod validate;

pub use color::Color;
pub use element::{Descendants, Element};
pub use error::SvgError;
pub use rasterize::{load_tree, RasterizedSvg};
pub use validate::{
    dangling_references, defined_ids, duplicate_ids, element_references, parse_length,
    parse_view_box, url_reference_spans, url_references, validate_file, validate_glyph,
    validate_markup, UrlReference,
};
