//! Pagecraft Icons
//!
//! Static icon tables for the pagecraft page builder. Every icon is compiled
//! in from `icons/` as a structured [`Glyph`]; markup strings are derived
//! from it on demand.
//!
//! # Example
//!
//! ```
//! use pagecraft_icons::{block_icon, icon, BlockFamily};
//!
//! let check = icon("check").unwrap();
//! assert!(check.to_markup().starts_with("<svg"));
//!
//! let accordion = block_icon("pc_accordion").unwrap();
//! assert_eq!(accordion.family(), BlockFamily::Builder);
//!
//! assert!(icon("not-a-real-icon").is_none());
//! ```
//!
//! # Internal ids
//!
//! Glyphs that define a `clipPath`, mask or gradient report
//! [`Glyph::has_scoped_ids`]. Render those through [`Glyph::render`] (or an
//! [`IconSheet`]) whenever the icon may appear more than once in a document.

mod block;
mod glyph;
mod hooks;
mod scope;
mod sheet;
mod table;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/icons.rs"));
}

pub use block::{BlockFamily, BlockIcon};
pub use generated::{block_glyphs, glyphs};
pub use glyph::{Attr, Glyph, Node, ViewBox};
pub use hooks::{custom_properties, StyleHook};
pub use scope::{process_scope, IdScope, RenderOptions, RenderedGlyph};
pub use sheet::{IconSheet, DEFAULT_CELL};
pub use table::{BlockIconTable, IconTable, BLOCK_ICONS, ICONS};

/// Look up a generic icon by name
pub fn icon(name: &str) -> Option<&'static Glyph> {
    ICONS.get(name)
}

/// Look up a block icon by module key
pub fn block_icon(key: &str) -> Option<&'static BlockIcon> {
    BLOCK_ICONS.get(key)
}
