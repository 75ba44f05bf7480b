//! Compiles the SVG assets under `icons/` into static glyph tables
//!
//! - `icons/generic/<name>.svg` become the generic icon table
//! - `icons/block/<key>.svg` become block icons with their own glyph
//! - `icons/blocks.toml` `[aliases]` map further block keys onto generic glyphs
//!
//! Malformed markup, duplicate keys, unknown block prefixes, duplicate or
//! dangling ids and bad alias targets fail the build.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use pagecraft_svg::url_references;
use walkdir::WalkDir;

/// Block key prefixes and the `BlockFamily` variant they map to
const BLOCK_FAMILIES: &[(&str, &str)] = &[("pcw_", "Commerce"), ("pc_", "Builder")];

/// Root attributes that belong to the embedding context, not the glyph
const DROPPED_ROOT_ATTRS: &[&str] = &["viewBox", "width", "height", "class"];

struct SourceNode {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<SourceNode>,
}

struct SourceGlyph {
    name: String,
    view_box: [f32; 4],
    attrs: Vec<(String, String)>,
    children: Vec<SourceNode>,
    ids: Vec<String>,
}

impl SourceGlyph {
    /// Canonical text of the drawing, used to spot duplicated definitions
    fn fingerprint(&self) -> String {
        let mut out = format!("{:?}", self.view_box);
        write_fingerprint(&mut out, &self.attrs, &self.children);
        out
    }
}

fn write_fingerprint(out: &mut String, attrs: &[(String, String)], children: &[SourceNode]) {
    for (name, value) in attrs {
        let _ = write!(out, " {name}={value:?}");
    }
    for child in children {
        let _ = write!(out, "<{}", child.tag);
        write_fingerprint(out, &child.attrs, &child.children);
        out.push('>');
    }
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let icons_dir = manifest_dir.join("icons");
    println!("cargo:rerun-if-changed=icons");

    let generic = load_dir(&icons_dir.join("generic"), is_generic_name);
    let blocks = load_dir(&icons_dir.join("block"), is_block_key);
    let aliases = load_aliases(&icons_dir.join("blocks.toml"));

    for (key, target) in &aliases {
        if !is_block_key(key) {
            panic!("blocks.toml: `{key}` is not a valid block key");
        }
        if blocks.contains_key(key) {
            panic!("blocks.toml: `{key}` is both an alias and icons/block/{key}.svg");
        }
        if !generic.contains_key(target) {
            panic!("blocks.toml: `{key}` aliases unknown generic icon `{target}`");
        }
    }

    // Hand-duplicated definitions are flagged, not rejected
    let generic_prints: HashMap<String, &str> = generic
        .values()
        .map(|g| (g.fingerprint(), g.name.as_str()))
        .collect();
    for block in blocks.values() {
        if let Some(name) = generic_prints.get(&block.fingerprint()) {
            println!(
                "cargo:warning=block icon `{}` duplicates generic icon `{}`; alias it in icons/blocks.toml if intended",
                block.name, name
            );
        }
    }

    let code = generate(&generic, &blocks, &aliases);
    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR")).join("icons.rs");
    fs::write(&out, code).unwrap_or_else(|e| panic!("writing {}: {e}", out.display()));
}

fn is_generic_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_block_key(key: &str) -> bool {
    let Some(family) = block_family(key) else {
        return false;
    };
    let prefix_len = BLOCK_FAMILIES
        .iter()
        .find(|(_, f)| *f == family)
        .map_or(0, |(p, _)| p.len());
    key.len() > prefix_len
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn block_family(key: &str) -> Option<&'static str> {
    BLOCK_FAMILIES
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, family)| *family)
}

fn ident(name: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

fn load_dir(dir: &Path, valid_name: fn(&str) -> bool) -> BTreeMap<String, SourceGlyph> {
    let mut glyphs = BTreeMap::new();
    let mut idents = HashMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.unwrap_or_else(|e| panic!("reading {}: {e}", dir.display()));
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_else(|| panic!("{}: file name is not UTF-8", path.display()))
            .to_string();
        if !valid_name(&name) {
            panic!("{}: `{name}` is not a valid icon key", path.display());
        }
        if let Some(other) = idents.insert(ident(&name), name.clone()) {
            panic!("{}: `{name}` collides with `{other}`", path.display());
        }

        let glyph = parse_glyph(path, name.clone());
        if glyphs.insert(name.clone(), glyph).is_some() {
            panic!("{}: duplicate icon `{name}`", path.display());
        }
    }

    glyphs
}

fn load_aliases(path: &Path) -> BTreeMap<String, String> {
    let content =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    let table: toml::Table = content
        .parse()
        .unwrap_or_else(|e| panic!("parsing {}: {e}", path.display()));

    let Some(aliases) = table.get("aliases") else {
        return BTreeMap::new();
    };
    let aliases = aliases
        .as_table()
        .unwrap_or_else(|| panic!("{}: [aliases] must be a table", path.display()));

    aliases
        .iter()
        .map(|(key, value)| {
            let target = value
                .as_str()
                .unwrap_or_else(|| panic!("{}: alias `{key}` must be a string", path.display()));
            (key.clone(), target.to_string())
        })
        .collect()
}

fn fail(path: &Path, msg: impl std::fmt::Display) -> ! {
    panic!("{}: {msg}", path.display())
}

fn parse_glyph(path: &Path, name: String) -> SourceGlyph {
    let content = fs::read_to_string(path).unwrap_or_else(|e| fail(path, e));
    let doc = roxmltree::Document::parse(&content).unwrap_or_else(|e| fail(path, e));
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        fail(path, format!("root element is <{}>", root.tag_name().name()));
    }

    let view_box = root
        .attribute("viewBox")
        .and_then(parse_view_box)
        .unwrap_or_else(|| fail(path, "missing or malformed viewBox"));

    let attrs = convert_attrs(path, root)
        .into_iter()
        .filter(|(n, _)| !DROPPED_ROOT_ATTRS.contains(&n.as_str()))
        .collect();
    let children = convert_children(path, root);

    let mut ids = Vec::new();
    let mut refs = Vec::new();
    collect_ids(&children, &mut ids, &mut refs);

    let mut seen = HashSet::new();
    for id in &ids {
        if !seen.insert(id.as_str()) {
            fail(path, format!("duplicate id `{id}`"));
        }
    }
    for r in &refs {
        if !seen.contains(r.as_str()) {
            fail(path, format!("reference to undefined id `{r}`"));
        }
    }

    SourceGlyph {
        name,
        view_box,
        attrs,
        children,
        ids,
    }
}

fn parse_view_box(value: &str) -> Option<[f32; 4]> {
    let numbers: Vec<f32> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    match numbers.as_slice() {
        &[x, y, w, h] if w > 0.0 && h > 0.0 => Some([x, y, w, h]),
        _ => None,
    }
}

fn convert_attrs(path: &Path, node: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    node.attributes()
        .map(|attr| {
            if let Some(ns) = attr.namespace() {
                fail(path, format!("namespaced attribute `{}` ({ns})", attr.name()));
            }
            (attr.name().to_string(), attr.value().to_string())
        })
        .collect()
}

fn convert_children(path: &Path, node: roxmltree::Node<'_, '_>) -> Vec<SourceNode> {
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(SourceNode {
                tag: child.tag_name().name().to_string(),
                attrs: convert_attrs(path, child),
                children: convert_children(path, child),
            });
        } else if child.is_text() && !child.text().unwrap_or_default().trim().is_empty() {
            fail(path, format!("text content inside <{}>", node.tag_name().name()));
        }
    }
    children
}

fn collect_ids(nodes: &[SourceNode], ids: &mut Vec<String>, refs: &mut Vec<String>) {
    for node in nodes {
        for (name, value) in &node.attrs {
            if name == "id" {
                ids.push(value.clone());
            } else if name == "href" {
                if let Some(id) = value.strip_prefix('#') {
                    refs.push(id.to_string());
                }
            } else {
                refs.extend(url_references(value).into_iter().map(str::to_string));
            }
        }
        collect_ids(&node.children, ids, refs);
    }
}

fn generate(
    generic: &BTreeMap<String, SourceGlyph>,
    blocks: &BTreeMap<String, SourceGlyph>,
    aliases: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();
    out.push_str("// Generated from icons/ by build.rs - DO NOT EDIT\n\n");

    out.push_str("/// Generic icon glyphs, one static per `icons/generic/*.svg`\n");
    out.push_str("pub mod glyphs {\n    use crate::glyph::{Attr, Glyph, Node, ViewBox};\n");
    for glyph in generic.values() {
        write_glyph(&mut out, glyph);
    }
    out.push_str("}\n\n");

    out.push_str("/// Glyphs owned by block icons, one static per `icons/block/*.svg`\n");
    out.push_str("pub mod block_glyphs {\n    use crate::glyph::{Attr, Glyph, Node, ViewBox};\n");
    for glyph in blocks.values() {
        write_glyph(&mut out, glyph);
    }
    out.push_str("}\n\n");

    let _ = writeln!(
        out,
        "pub(crate) static GLYPHS: [&crate::glyph::Glyph; {}] = [",
        generic.len()
    );
    for glyph in generic.values() {
        let _ = writeln!(out, "    &glyphs::{},", ident(&glyph.name));
    }
    out.push_str("];\n\n");

    // Own files and aliases, merged in key order
    let mut entries: BTreeMap<&str, (String, bool)> = BTreeMap::new();
    for key in blocks.keys() {
        entries.insert(key, (format!("block_glyphs::{}", ident(key)), false));
    }
    for (key, target) in aliases {
        entries.insert(key, (format!("glyphs::{}", ident(target)), true));
    }

    let _ = writeln!(
        out,
        "pub(crate) static BLOCKS: [crate::block::BlockIcon; {}] = [",
        entries.len()
    );
    for (key, (glyph, alias)) in &entries {
        let family = block_family(key).expect("validated block key");
        let _ = writeln!(
            out,
            "    crate::block::BlockIcon::new({key:?}, crate::block::BlockFamily::{family}, &{glyph}, {alias}),"
        );
    }
    out.push_str("];\n\n");

    out.push_str("pub(crate) fn glyph_index(name: &str) -> Option<usize> {\n    match name {\n");
    for (i, name) in generic.keys().enumerate() {
        let _ = writeln!(out, "        {name:?} => Some({i}),");
    }
    out.push_str("        _ => None,\n    }\n}\n\n");

    out.push_str("pub(crate) fn block_index(key: &str) -> Option<usize> {\n    match key {\n");
    for (i, key) in entries.keys().enumerate() {
        let _ = writeln!(out, "        {key:?} => Some({i}),");
    }
    out.push_str("        _ => None,\n    }\n}\n");

    out
}

fn write_glyph(out: &mut String, glyph: &SourceGlyph) {
    let [x, y, w, h] = glyph.view_box;
    let _ = writeln!(out, "\n    /// {}", glyph.name.replace(['-', '_'], " "));
    let _ = writeln!(out, "    pub static {}: Glyph = Glyph {{", ident(&glyph.name));
    let _ = writeln!(out, "        name: {:?},", glyph.name);
    let _ = writeln!(
        out,
        "        view_box: ViewBox {{ min_x: {x:?}, min_y: {y:?}, width: {w:?}, height: {h:?} }},"
    );
    let _ = writeln!(out, "        attrs: {},", attrs_literal(&glyph.attrs));
    out.push_str("        children: ");
    write_nodes(out, &glyph.children, 2);
    out.push_str(",\n");
    let _ = writeln!(out, "        ids: &{:?},", glyph.ids);
    out.push_str("    };\n");
}

fn attrs_literal(attrs: &[(String, String)]) -> String {
    let items: Vec<String> = attrs
        .iter()
        .map(|(n, v)| format!("Attr {{ name: {n:?}, value: {v:?} }}"))
        .collect();
    format!("&[{}]", items.join(", "))
}

fn write_nodes(out: &mut String, nodes: &[SourceNode], depth: usize) {
    if nodes.is_empty() {
        out.push_str("&[]");
        return;
    }
    let indent = "    ".repeat(depth + 1);
    out.push_str("&[\n");
    for node in nodes {
        let _ = write!(
            out,
            "{indent}Node {{ tag: {:?}, attrs: {}, children: ",
            node.tag,
            attrs_literal(&node.attrs)
        );
        write_nodes(out, &node.children, depth + 1);
        out.push_str(" },\n");
    }
    out.push_str(&"    ".repeat(depth));
    out.push(']');
}
