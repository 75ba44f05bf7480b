//! Lookup tables over the generated glyphs

use crate::block::{BlockFamily, BlockIcon};
use crate::generated::{block_index, glyph_index, BLOCKS, GLYPHS};
use crate::glyph::Glyph;

/// Every generic icon, keyed by name
pub static ICONS: IconTable = IconTable { _private: () };

/// Every block icon, keyed by module identifier
pub static BLOCK_ICONS: BlockIconTable = BlockIconTable { _private: () };

/// Read-only table of generic icons
#[derive(Debug)]
pub struct IconTable {
    _private: (),
}

impl IconTable {
    /// Look up a glyph by name
    ///
    /// Unknown names return `None`; no placeholder is substituted.
    pub fn get(&self, name: &str) -> Option<&'static Glyph> {
        glyph_index(name).map(|i| GLYPHS[i])
    }

    /// Look up a glyph, falling back to `fallback` for unknown names
    pub fn get_or(&self, name: &str, fallback: &'static Glyph) -> &'static Glyph {
        self.get(name).unwrap_or_else(|| {
            tracing::debug!(name, fallback = fallback.name(), "unknown icon, using fallback");
            fallback
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        glyph_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        GLYPHS.len()
    }

    pub fn is_empty(&self) -> bool {
        GLYPHS.is_empty()
    }

    /// All glyphs, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &'static Glyph> {
        GLYPHS.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.iter().map(Glyph::name)
    }
}

/// Read-only table of block icons
#[derive(Debug)]
pub struct BlockIconTable {
    _private: (),
}

impl BlockIconTable {
    /// Look up a block icon by exact key, e.g. `pc_accordion`
    pub fn get(&self, key: &str) -> Option<&'static BlockIcon> {
        block_index(key).map(|i| &BLOCKS[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        block_index(key).is_some()
    }

    pub fn len(&self) -> usize {
        BLOCKS.len()
    }

    pub fn is_empty(&self) -> bool {
        BLOCKS.is_empty()
    }

    /// All block icons, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = &'static BlockIcon> {
        BLOCKS.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.iter().map(BlockIcon::key)
    }

    /// Block icons of one family
    pub fn by_family(&self, family: BlockFamily) -> impl Iterator<Item = &'static BlockIcon> {
        self.iter().filter(move |block| block.family() == family)
    }

    /// Block icons whose own definition draws the same thing as a generic icon
    ///
    /// Aliased entries already share the generic glyph and are not reported.
    pub fn duplicated_definitions(&self) -> Vec<(&'static BlockIcon, &'static Glyph)> {
        let mut duplicates = Vec::new();
        for block in self.iter().filter(|block| !block.is_alias()) {
            if let Some(glyph) = ICONS.iter().find(|glyph| glyph.same_drawing(block.glyph())) {
                duplicates.push((block, glyph));
            }
        }
        duplicates
    }
}
