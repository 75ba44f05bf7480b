//! Checks over the full generated icon tables

use pagecraft_icons::{custom_properties, BlockFamily, Glyph, StyleHook, BLOCK_ICONS, ICONS};
use pagecraft_svg::{element_references, load_tree, validate_markup, Element};

fn all_glyphs() -> impl Iterator<Item = &'static Glyph> {
    ICONS.iter().chain(BLOCK_ICONS.iter().map(|block| block.glyph()))
}

#[test]
fn every_glyph_is_well_formed() {
    for glyph in all_glyphs() {
        let markup = glyph.to_markup();
        if let Err(e) = validate_markup(&markup) {
            panic!("{} is not a valid glyph: {e}\n{markup}", glyph.name());
        }
    }
}

#[test]
fn markup_parses_back_to_the_structured_form() {
    for glyph in all_glyphs() {
        let parsed = Element::parse(&glyph.to_markup()).unwrap();
        assert_eq!(parsed, glyph.to_tree(), "{}", glyph.name());
    }
}

#[test]
fn every_glyph_loads_in_usvg() {
    for glyph in all_glyphs() {
        let tree = load_tree(&glyph.to_markup())
            .unwrap_or_else(|e| panic!("{} failed to load: {e}", glyph.name()));
        assert!(tree.size().width() > 0.0);
    }
}

#[test]
fn block_markup_matches_its_glyph() {
    for block in BLOCK_ICONS.iter() {
        assert_eq!(block.markup(), block.glyph().to_markup(), "{}", block.key());
        // Cached after first use
        assert!(std::ptr::eq(block.markup(), block.markup()));
    }
}

#[test]
fn names_follow_the_convention() {
    for name in ICONS.names() {
        assert!(!name.is_empty());
        assert!(
            name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "bad icon name {name}"
        );
    }

    for block in BLOCK_ICONS.iter() {
        let key = block.key();
        assert_eq!(BlockFamily::of_key(key), Some(block.family()), "{key}");
        assert!(key.starts_with(block.family().prefix()));
        assert!(
            key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "bad block key {key}"
        );
    }
}

#[test]
fn keys_are_unique() {
    let mut names: Vec<_> = ICONS.names().collect();
    names.dedup();
    assert_eq!(names.len(), ICONS.len());

    let mut keys: Vec<_> = BLOCK_ICONS.keys().collect();
    keys.dedup();
    assert_eq!(keys.len(), BLOCK_ICONS.len());
}

#[test]
fn lookups_agree_with_iteration() {
    for glyph in ICONS.iter() {
        assert!(std::ptr::eq(ICONS.get(glyph.name()).unwrap(), glyph));
    }
    for block in BLOCK_ICONS.iter() {
        assert!(std::ptr::eq(BLOCK_ICONS.get(block.key()).unwrap(), block));
    }
}

#[test]
fn expected_entries_exist() {
    for name in ["check", "close", "toggle", "color-swatch", "undo", "redo", "trash"] {
        assert!(ICONS.contains(name), "missing icon {name}");
    }
    for key in ["pc_accordion", "pc_text", "pc_toggle", "pcw_price", "pcw_add_to_cart"] {
        assert!(BLOCK_ICONS.contains(key), "missing block icon {key}");
    }
}

#[test]
fn check_icon_has_the_expected_path() {
    let check = ICONS.get("check").unwrap();
    let tree = check.to_tree();
    let path = tree.descendants().find(|e| e.tag == "path").unwrap();
    assert_eq!(path.attr("d"), Some("M9 16.2 4.8 12l-1.4 1.4L9 19 21 7l-1.4-1.4L9 16.2z"));
}

#[test]
fn unknown_lookups_are_absent() {
    assert!(pagecraft_icons::icon("not-a-real-icon").is_none());
    assert!(pagecraft_icons::block_icon("not-a-real-icon").is_none());
    assert!(pagecraft_icons::block_icon("pc_not_a_real_block").is_none());
}

#[test]
fn every_custom_property_is_a_known_hook() {
    for glyph in all_glyphs() {
        let values = glyph
            .attrs()
            .iter()
            .chain(glyph.nodes().flat_map(|n| n.attrs.iter()))
            .map(|a| a.value);
        for value in values {
            for property in custom_properties(value) {
                assert!(
                    StyleHook::from_property(property).is_some(),
                    "{} reads unknown property {property}",
                    glyph.name()
                );
            }
        }
    }
}

#[test]
fn stateful_glyphs_expose_their_hooks() {
    assert_eq!(
        ICONS.get("toggle").unwrap().style_hooks(),
        [StyleHook::ToggleOn, StyleHook::ToggleOff]
    );
    assert_eq!(
        ICONS.get("color-swatch").unwrap().style_hooks(),
        [StyleHook::SwatchSelected, StyleHook::SwatchSelectedColor]
    );
    assert!(ICONS.get("check").unwrap().style_hooks().is_empty());
}

#[test]
fn only_glyphs_with_definitions_need_scoping() {
    let scoped: Vec<_> = all_glyphs()
        .filter(|g| g.has_scoped_ids())
        .map(Glyph::name)
        .collect();
    assert!(scoped.contains(&"color-swatch"));
    for glyph in all_glyphs() {
        let defines_ids = glyph.to_tree().descendants().any(|e| e.id().is_some());
        assert_eq!(glyph.has_scoped_ids(), defines_ids, "{}", glyph.name());
    }
}

#[test]
fn every_reference_targets_a_declared_id() {
    for glyph in all_glyphs() {
        let tree = glyph.to_tree();
        for element in tree.descendants() {
            for id in element_references(element) {
                assert!(
                    glyph.ids().contains(&id),
                    "{} references `{id}`, which is not one of its scoped ids",
                    glyph.name()
                );
            }
        }
    }
}
