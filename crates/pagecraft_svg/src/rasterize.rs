//! SVG rasterization using resvg for anti-aliased previews
//!
//! Glyphs draw with `currentColor`, which resvg resolves to black. A tint
//! re-colors every covered pixel, standing in for the foreground color the
//! embedding UI would supply.

use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

use crate::color::Color;
use crate::error::SvgError;

/// Parse markup into a usvg tree
pub fn load_tree(svg_str: &str) -> Result<Tree, SvgError> {
    let options = Options::default();
    Tree::from_str(svg_str, &options).map_err(|e| SvgError::Parse(e.to_string()))
}

/// Rasterized SVG image data
pub struct RasterizedSvg {
    /// RGBA pixel data, straight alpha
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RasterizedSvg {
    /// Rasterize an SVG string to the specified size
    ///
    /// The SVG will be scaled to fit within the given dimensions while
    /// maintaining aspect ratio, centered within the bounds.
    pub fn from_str(svg_str: &str, width: u32, height: u32) -> Result<Self, SvgError> {
        check_dimensions(width, height)?;
        let tree = load_tree(svg_str)?;
        Self::from_tree(&tree, width, height)
    }

    /// Rasterize a parsed usvg Tree to the specified size
    pub fn from_tree(tree: &Tree, width: u32, height: u32) -> Result<Self, SvgError> {
        check_dimensions(width, height)?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SvgError::Parse("Failed to create pixmap".into()))?;

        // Fit in bounds, keep aspect ratio, center
        let svg_size = tree.size();
        let scale = (width as f32 / svg_size.width()).min(height as f32 / svg_size.height());
        let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);

        tracing::debug!(width, height, scale, "rasterizing svg");
        resvg::render(tree, transform, &mut pixmap.as_mut());

        Ok(Self {
            pixels: unpremultiply_alpha(pixmap.data()),
            width,
            height,
        })
    }

    /// Rasterize an SVG string with a tint color applied
    pub fn from_str_with_tint(
        svg_str: &str,
        width: u32,
        height: u32,
        tint: Color,
    ) -> Result<Self, SvgError> {
        let mut rasterized = Self::from_str(svg_str, width, height)?;
        rasterized.apply_tint(tint);
        Ok(rasterized)
    }

    /// Replace the RGB of every covered pixel with `tint`, keeping coverage
    ///
    /// The tint's alpha scales coverage.
    pub fn apply_tint(&mut self, tint: Color) {
        let to_byte = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        for chunk in self.pixels.chunks_exact_mut(4) {
            if chunk[3] > 0 {
                chunk[0] = to_byte(tint.r);
                chunk[1] = to_byte(tint.g);
                chunk[2] = to_byte(tint.b);
                chunk[3] = to_byte(chunk[3] as f32 / 255.0 * tint.a);
            }
        }
    }

    /// RGBA of one pixel, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Whether any pixel has non-zero coverage
    pub fn has_coverage(&self) -> bool {
        self.pixels.chunks_exact(4).any(|p| p[3] > 0)
    }

    /// Copy out a rectangular region as a new image
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if x + width > self.width || y + height > self.height {
            return None;
        }
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for row in y..y + height {
            let start = ((row * self.width + x) * 4) as usize;
            pixels.extend_from_slice(&self.pixels[start..start + (width * 4) as usize]);
        }
        Some(Self {
            pixels,
            width,
            height,
        })
    }

    /// Get the pixel data as a slice
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Get the dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), SvgError> {
    if width == 0 || height == 0 {
        return Err(SvgError::Parse(
            "Invalid dimensions: width and height must be > 0".into(),
        ));
    }
    Ok(())
}

/// Convert premultiplied alpha to straight alpha
fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = ((chunk[0] as f32 / a).min(255.0)) as u8;
            let g = ((chunk[1] as f32 / a).min(255.0)) as u8;
            let b = ((chunk[2] as f32 / a).min(255.0)) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_current_color_glyph() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><circle cx="12" cy="12" r="10"/></svg>"#;

        let rasterized = RasterizedSvg::from_str(svg, 48, 48).unwrap();
        assert_eq!(rasterized.dimensions(), (48, 48));
        assert_eq!(rasterized.pixels.len(), 48 * 48 * 4);
        assert!(rasterized.has_coverage());
        assert_eq!(rasterized.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(rasterized.pixel(24, 24).map(|p| p[3]), Some(255));
        assert_eq!(rasterized.pixel(48, 0), None);
    }

    #[test]
    fn test_rasterize_with_tint() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><rect width="24" height="24"/></svg>"#;

        let tint = Color::rgba(0.0, 1.0, 0.0, 1.0);
        let rasterized = RasterizedSvg::from_str_with_tint(svg, 24, 24, tint).unwrap();

        assert_eq!(rasterized.pixel(12, 12), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_crop() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 24"><rect width="24" height="24"/></svg>"#;
        let rasterized = RasterizedSvg::from_str(svg, 48, 24).unwrap();

        let left = rasterized.crop(0, 0, 24, 24).unwrap();
        let right = rasterized.crop(24, 0, 24, 24).unwrap();
        assert!(left.has_coverage());
        assert!(!right.has_coverage());
        assert!(rasterized.crop(30, 0, 24, 24).is_none());
    }

    #[test]
    fn test_zero_dimensions_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"></svg>"#;
        assert!(RasterizedSvg::from_str(svg, 0, 24).is_err());
        assert!(RasterizedSvg::from_str(svg, 24, 0).is_err());
    }

    #[test]
    fn test_invalid_markup_error() {
        assert!(matches!(load_tree("<svg"), Err(SvgError::Parse(_))));
    }
}
