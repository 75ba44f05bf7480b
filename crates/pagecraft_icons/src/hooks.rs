//! Styling hooks
//!
//! A few glyphs read CSS custom properties that the embedding UI sets before
//! render: a toggle's on/off state and a color swatch's "selected" ring.
//! The property names are part of the public contract and must not change.

/// A CSS custom property a glyph reads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleHook {
    /// Opacity of the toggle's "on" track and knob
    ToggleOn,
    /// Opacity of the toggle's "off" knob
    ToggleOff,
    /// Opacity of the swatch's selection ring
    SwatchSelected,
    /// Stroke color of the swatch's selection ring
    SwatchSelectedColor,
}

impl StyleHook {
    pub const ALL: [StyleHook; 4] = [
        StyleHook::ToggleOn,
        StyleHook::ToggleOff,
        StyleHook::SwatchSelected,
        StyleHook::SwatchSelectedColor,
    ];

    /// The custom property name, including the leading `--`
    pub const fn property(self) -> &'static str {
        match self {
            StyleHook::ToggleOn => "--pc-toggle-on-opacity",
            StyleHook::ToggleOff => "--pc-toggle-off-opacity",
            StyleHook::SwatchSelected => "--pc-swatch-selected-opacity",
            StyleHook::SwatchSelectedColor => "--pc-swatch-selected-color",
        }
    }

    pub fn from_property(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|hook| hook.property() == name)
    }
}

/// Custom property names referenced through `var(..)` in a CSS value
pub fn custom_properties(value: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find("var(") {
        let tail = &rest[start + 4..];
        let end = tail.find([',', ')']).unwrap_or(tail.len());
        let name = tail[..end].trim();
        if name.starts_with("--") {
            names.push(name);
        }
        rest = &tail[end..];
    }
    names
}
