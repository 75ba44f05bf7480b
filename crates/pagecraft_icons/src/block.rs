//! Block icons
//!
//! Block icons are keyed by the identifier of the builder module they
//! decorate. Keys carry a family prefix that consumers filter on:
//!
//! | Family | Prefix |
//! |--------|--------|
//! | [`BlockFamily::Builder`] | `pc_` |
//! | [`BlockFamily::Commerce`] | `pcw_` |

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::glyph::Glyph;

/// The product family a block icon belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockFamily {
    /// Core page-builder modules
    Builder,
    /// Shop / commerce modules
    Commerce,
}

impl BlockFamily {
    pub const ALL: [BlockFamily; 2] = [BlockFamily::Builder, BlockFamily::Commerce];

    /// Key prefix, e.g. `pc_`
    pub const fn prefix(self) -> &'static str {
        match self {
            BlockFamily::Builder => "pc_",
            BlockFamily::Commerce => "pcw_",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockFamily::Builder => "builder",
            BlockFamily::Commerce => "commerce",
        }
    }

    /// The family a key belongs to, if it follows the naming convention
    pub fn of_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| {
            key.strip_prefix(family.prefix())
                .is_some_and(|rest| !rest.is_empty())
        })
    }
}

impl fmt::Display for BlockFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for BlockFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown block family '{s}' (expected builder or commerce)"))
    }
}

/// A block icon: a key, its family and the glyph it shows
///
/// The markup string is derived from the glyph on first use and cached.
#[derive(Debug)]
pub struct BlockIcon {
    key: &'static str,
    family: BlockFamily,
    glyph: &'static Glyph,
    alias: bool,
    markup: OnceLock<String>,
}

impl BlockIcon {
    pub(crate) const fn new(
        key: &'static str,
        family: BlockFamily,
        glyph: &'static Glyph,
        alias: bool,
    ) -> Self {
        Self {
            key,
            family,
            glyph,
            alias,
            markup: OnceLock::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn family(&self) -> BlockFamily {
        self.family
    }

    /// The structured definition behind this block icon
    pub fn glyph(&self) -> &'static Glyph {
        self.glyph
    }

    /// Whether the glyph is shared with the generic icon table
    pub fn is_alias(&self) -> bool {
        self.alias
    }

    /// The serialized markup of the glyph
    ///
    /// Internal ids appear verbatim. When [`Glyph::has_scoped_ids`] is true
    /// and the icon may appear more than once per document, render through
    /// [`Glyph::render`] instead.
    pub fn markup(&self) -> &str {
        self.markup.get_or_init(|| self.glyph.to_markup())
    }
}
