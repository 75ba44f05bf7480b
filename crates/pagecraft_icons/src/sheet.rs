//! Icon sheets
//!
//! An [`IconSheet`] lays glyphs out in a single row inside one `<svg>`
//! document. Every placed glyph is a separate render instance in the
//! sheet's [`IdScope`], so glyphs with internal ids can repeat freely.

use pagecraft_svg::markup::{close_tag, format_number, open_tag, SVG_NS};

use crate::glyph::Glyph;
use crate::scope::{IdScope, RenderOptions, RenderedGlyph};

/// Default cell edge, in user units
pub const DEFAULT_CELL: f32 = 24.0;

/// A row of rendered glyphs sharing one document
#[derive(Debug)]
pub struct IconSheet {
    scope: IdScope,
    cell: f32,
    gap: f32,
    height: f32,
    instances: Vec<RenderedGlyph>,
}

impl Default for IconSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl IconSheet {
    pub fn new() -> Self {
        Self::with_scope(IdScope::new())
    }

    /// A sheet drawing ids from `scope`
    ///
    /// Give each sheet embedded in the same page its own prefixed scope.
    pub fn with_scope(scope: IdScope) -> Self {
        Self {
            scope,
            cell: DEFAULT_CELL,
            gap: 0.0,
            height: 0.0,
            instances: Vec::new(),
        }
    }

    /// Set the cell edge length
    pub fn cell(mut self, cell: f32) -> Self {
        self.cell = cell;
        self
    }

    /// Set the spacing between cells
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn scope(&self) -> &IdScope {
        &self.scope
    }

    /// Place `glyph` in the next cell
    pub fn push(&mut self, glyph: &Glyph) -> &RenderedGlyph {
        let x = self.instances.len() as f32 * (self.cell + self.gap);
        let options = RenderOptions::new().size(self.cell).position(x, 0.0);
        let rendered = glyph.render_with(&self.scope, &options);
        self.height = self.height.max(glyph.view_box().height_for(self.cell));
        tracing::debug!(glyph = glyph.name(), x, ids = ?rendered.ids(), "placed glyph on sheet");

        let index = self.instances.len();
        self.instances.push(rendered);
        &self.instances[index]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Rendered instances, in placement order
    pub fn instances(&self) -> &[RenderedGlyph] {
        &self.instances
    }

    /// Total width of the sheet
    pub fn width(&self) -> f32 {
        match self.instances.len() {
            0 => 0.0,
            n => n as f32 * self.cell + (n - 1) as f32 * self.gap,
        }
    }

    /// Height of the tallest placed glyph
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The full sheet document
    pub fn to_markup(&self) -> String {
        let width = format_number(self.width());
        let height = format_number(self.height());
        let view_box = format!("0 0 {width} {height}");
        let attrs = [
            ("xmlns", SVG_NS),
            ("viewBox", view_box.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ];

        let mut out = String::new();
        if self.instances.is_empty() {
            open_tag(&mut out, "svg", attrs, true);
            return out;
        }
        open_tag(&mut out, "svg", attrs, false);
        for instance in &self.instances {
            out.push_str(instance.markup());
        }
        close_tag(&mut out, "svg");
        out
    }
}
