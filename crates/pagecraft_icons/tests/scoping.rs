//! Rendering glyphs with internal ids several times into one document

use pagecraft_icons::{glyphs, IconSheet, IdScope};
use pagecraft_svg::{dangling_references, duplicate_ids, element_references, Element};

fn two_swatch_sheet() -> IconSheet {
    let mut sheet = IconSheet::with_scope(IdScope::with_prefix("sheet"));
    sheet.push(&glyphs::COLOR_SWATCH);
    sheet.push(&glyphs::COLOR_SWATCH);
    sheet
}

#[test]
fn naive_concatenation_collides() {
    let swatch = glyphs::COLOR_SWATCH.to_markup();
    let document = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 24">{swatch}{swatch}</svg>"#
    );
    let root = Element::parse(&document).unwrap();
    assert_eq!(duplicate_ids(&root), ["swatch-clip"]);
}

#[test]
fn repeated_renders_get_distinct_ids() {
    let scope = IdScope::new();
    let renders: Vec<_> = (0..8).map(|_| glyphs::COLOR_SWATCH.render_in(&scope)).collect();

    let mut ids: Vec<_> = renders.iter().flat_map(|r| r.ids().to_vec()).collect();
    assert_eq!(ids.len(), 8);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[test]
fn process_scope_renders_are_distinct() {
    let first = glyphs::COLOR_SWATCH.render();
    let second = glyphs::COLOR_SWATCH.render();
    assert_ne!(first.ids(), second.ids());
    assert_ne!(first.markup(), second.markup());
}

#[test]
fn sheet_has_no_duplicate_or_dangling_ids() {
    let root = Element::parse(&two_swatch_sheet().to_markup()).unwrap();
    assert!(duplicate_ids(&root).is_empty());
    assert!(dangling_references(&root).is_empty());
}

#[test]
fn every_reference_resolves_inside_its_own_instance() {
    let root = Element::parse(&two_swatch_sheet().to_markup()).unwrap();
    assert_eq!(root.children.len(), 2);

    for instance in &root.children {
        let refs: Vec<_> = instance.descendants().flat_map(element_references).collect();
        assert!(!refs.is_empty());
        for id in refs {
            assert!(
                instance.find_by_id(id).is_some(),
                "reference to {id} escapes its instance"
            );
        }
    }
}

#[test]
fn glyphs_without_ids_render_verbatim() {
    let scope = IdScope::new();
    let rendered = glyphs::CHECK.render_in(&scope);
    assert!(rendered.ids().is_empty());
    assert_eq!(rendered.markup(), glyphs::CHECK.to_markup());
    // No instance number consumed
    assert_eq!(scope.next_instance(), 0);
}
