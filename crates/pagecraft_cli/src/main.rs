//! Pagecraft CLI
//!
//! Inspect, render and check the pagecraft icon tables.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagecraft_icons::{BlockFamily, Glyph, IconSheet, IdScope, StyleHook, BLOCK_ICONS, ICONS};
use pagecraft_svg::{load_tree, validate_file, validate_markup, Color, RasterizedSvg};
use walkdir::WalkDir;

mod config;

use config::PagecraftConfig;

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pagecraft icon tables CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List icon names or block icon keys
    List {
        /// List block icons instead of generic icons
        #[arg(short, long)]
        blocks: bool,

        /// Only block icons of this family (builder, commerce)
        #[arg(short, long)]
        family: Option<BlockFamily>,
    },

    /// Print the markup of one icon
    Show {
        /// Icon name, or block key with --block
        name: String,

        /// Look the name up in the block icon table
        #[arg(short, long)]
        block: bool,
    },

    /// Rasterize one icon to PNG
    Render {
        /// Icon name, or block key with --block
        name: String,

        /// Look the name up in the block icon table
        #[arg(short, long)]
        block: bool,

        /// Width in pixels
        #[arg(short, long)]
        size: Option<u32>,

        /// Tint for currentColor (#rgb, #rrggbb or #rrggbbaa)
        #[arg(short, long)]
        color: Option<String>,

        /// Output path (defaults to <name>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose several icons into one SVG document
    Sheet {
        /// Icon names or block keys, in placement order
        #[arg(required = true)]
        names: Vec<String>,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate every glyph in both tables, or the given SVG files
    Check {
        /// SVG files or directories to validate instead of the built-in tables
        paths: Vec<PathBuf>,
    },

    /// Show table and styling hook information
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cwd = std::env::current_dir()?;
    run(cli.command, &cwd)
}

/// Run one command; `dir` is where `pagecraft.toml` is looked up
fn run(command: Commands, dir: &Path) -> Result<()> {
    match command {
        Commands::List { blocks, family } => cmd_list(blocks || family.is_some(), family),

        Commands::Show { name, block } => cmd_show(&name, block),

        Commands::Render {
            name,
            block,
            size,
            color,
            output,
        } => cmd_render(dir, &name, block, size, color.as_deref(), output),

        Commands::Sheet { names, output } => cmd_sheet(dir, &names, output),

        Commands::Check { paths } if paths.is_empty() => cmd_check(),

        Commands::Check { paths } => cmd_check_files(&paths),

        Commands::Info => cmd_info(),
    }
}

fn lookup(name: &str, block: bool) -> Result<&'static Glyph> {
    if block {
        return BLOCK_ICONS
            .get(name)
            .map(|b| b.glyph())
            .with_context(|| format!("Unknown block icon '{}'", name));
    }
    ICONS
        .get(name)
        .with_context(|| format!("Unknown icon '{}'. Run `pagecraft list` to see all names", name))
}

fn cmd_list(blocks: bool, family: Option<BlockFamily>) -> Result<()> {
    if !blocks {
        for name in ICONS.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let entries: Vec<_> = match family {
        Some(family) => BLOCK_ICONS.by_family(family).collect(),
        None => BLOCK_ICONS.iter().collect(),
    };
    for block in entries {
        if block.is_alias() {
            println!("{:<24} {:<9} -> {}", block.key(), block.family(), block.glyph().name());
        } else {
            println!("{:<24} {}", block.key(), block.family());
        }
    }
    Ok(())
}

fn cmd_show(name: &str, block: bool) -> Result<()> {
    let glyph = lookup(name, block)?;
    println!("{}", glyph.render());
    Ok(())
}

fn cmd_render(
    dir: &Path,
    name: &str,
    block: bool,
    size: Option<u32>,
    color: Option<&str>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = PagecraftConfig::load_from_dir(dir)?;
    let glyph = lookup(name, block)?;
    let width = size.unwrap_or(config.render.size);
    if width == 0 {
        anyhow::bail!("Size must be greater than 0");
    }
    let height = (glyph.view_box().height_for(width as f32).round() as u32).max(1);

    let color = color.unwrap_or(&config.render.color);
    let tint = Color::from_hex(color).with_context(|| format!("Invalid color '{}'", color))?;

    let rendered = glyph.render_in(&IdScope::new());
    let raster = RasterizedSvg::from_str_with_tint(rendered.markup(), width, height, tint)
        .with_context(|| format!("Failed to rasterize '{}'", name))?;

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
    let (width, height) = raster.dimensions();
    let buffer = image::RgbaImage::from_raw(width, height, raster.pixels)
        .context("Rasterized buffer does not match its dimensions")?;
    buffer
        .save_with_format(&output, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Rendered {} ({}x{}) to {}", name, width, height, output.display());
    Ok(())
}

fn cmd_sheet(dir: &Path, names: &[String], output: Option<PathBuf>) -> Result<()> {
    let config = PagecraftConfig::load_from_dir(dir)?;
    let scope = IdScope::with_prefix(config.sheet.id_prefix.clone());
    let mut sheet = IconSheet::with_scope(scope)
        .cell(config.sheet.cell)
        .gap(config.sheet.gap);

    for name in names {
        let glyph = match ICONS.get(name) {
            Some(glyph) => glyph,
            None => lookup(name, true)?,
        };
        sheet.push(glyph);
    }

    let markup = sheet.to_markup();
    match output {
        Some(path) => {
            fs::write(&path, &markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} icons to {}", sheet.len(), path.display());
        }
        None => println!("{}", markup),
    }
    Ok(())
}

fn cmd_check() -> Result<()> {
    let entries = ICONS
        .iter()
        .map(|glyph| (glyph.name(), glyph))
        .chain(BLOCK_ICONS.iter().map(|block| (block.key(), block.glyph())));

    let mut checked = 0;
    let mut errors = 0;
    for (key, glyph) in entries {
        checked += 1;
        let markup = glyph.to_markup();
        if let Err(e) = validate_markup(&markup) {
            warn!("{}: {}", key, e);
            errors += 1;
            continue;
        }
        if let Err(e) = load_tree(&markup) {
            warn!("{}: {}", key, e);
            errors += 1;
        }
    }

    for block in BLOCK_ICONS.iter() {
        if BlockFamily::of_key(block.key()) != Some(block.family()) {
            warn!("{}: key does not match the {} prefix", block.key(), block.family());
            errors += 1;
        }
    }

    // Reported only; whether these should become aliases is an owner decision
    let duplicates = BLOCK_ICONS.duplicated_definitions();
    for (block, glyph) in &duplicates {
        warn!(
            "{} duplicates generic icon '{}'; consider an alias in blocks.toml",
            block.key(),
            glyph.name()
        );
    }

    if errors > 0 {
        anyhow::bail!("{} of {} glyphs failed validation", errors, checked);
    }

    info!(
        "Checked {} glyphs: ok ({} duplicated definitions)",
        checked,
        duplicates.len()
    );
    Ok(())
}

fn cmd_check_files(paths: &[PathBuf]) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                if entry.path().extension().is_some_and(|ext| ext == "svg") {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    let mut errors = 0;
    for file in &files {
        match validate_file(file) {
            Ok(_) => tracing::debug!("{}: ok", file.display()),
            Err(e) => {
                warn!("{}: {}", file.display(), e);
                errors += 1;
            }
        }
    }

    if errors > 0 {
        anyhow::bail!("{} of {} files failed validation", errors, files.len());
    }
    info!("Checked {} files: ok", files.len());
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("Pagecraft Icons");
    println!("===============");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Generic icons: {}", ICONS.len());
    println!("Block icons:   {}", BLOCK_ICONS.len());
    for family in BlockFamily::ALL {
        let total = BLOCK_ICONS.by_family(family).count();
        let aliases = BLOCK_ICONS.by_family(family).filter(|b| b.is_alias()).count();
        println!(
            "  - {} ({}*): {} ({} aliases)",
            family,
            family.prefix(),
            total,
            aliases
        );
    }
    println!();
    println!("Styling hooks:");
    for hook in StyleHook::ALL {
        let users: Vec<_> = ICONS
            .iter()
            .filter(|g| g.style_hooks().contains(&hook))
            .map(Glyph::name)
            .collect();
        println!("  - {} ({})", hook.property(), users.join(", "));
    }
    println!();
    println!("Glyphs with per-render ids:");
    for glyph in ICONS.iter().filter(|g| g.has_scoped_ids()) {
        println!("  - {} ({})", glyph.name(), glyph.ids().join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_with_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(config::CONFIG_FILE), contents).unwrap();
        dir
    }

    #[test]
    fn test_bad_config_only_fails_commands_that_read_it() {
        let dir = dir_with_config("pagecraft-cli-bad-config", "[render]\nsize = 0\n");

        let list = Commands::List {
            blocks: false,
            family: None,
        };
        assert!(run(list, &dir).is_ok());
        assert!(run(Commands::Info, &dir).is_ok());
        assert!(run(Commands::Check { paths: Vec::new() }, &dir).is_ok());

        let output = dir.join("sheet.svg");
        let sheet = Commands::Sheet {
            names: vec!["check".to_string()],
            output: Some(output.clone()),
        };
        assert!(run(sheet, &dir).is_err());
        assert!(!output.exists());

        let render = Commands::Render {
            name: "check".to_string(),
            block: false,
            size: Some(16),
            color: None,
            output: Some(dir.join("check.png")),
        };
        assert!(run(render, &dir).is_err());
    }

    #[test]
    fn test_sheet_uses_config_from_dir() {
        let dir = dir_with_config("pagecraft-cli-sheet-config", "[sheet]\ngap = 0\nid_prefix = \"page\"\n");
        let output = dir.join("sheet.svg");
        let sheet = Commands::Sheet {
            names: vec!["color-swatch".to_string(), "color-swatch".to_string()],
            output: Some(output.clone()),
        };
        run(sheet, &dir).unwrap();

        let markup = fs::read_to_string(&output).unwrap();
        assert!(markup.contains(r#"viewBox="0 0 48 24""#));
        assert!(markup.contains("page-swatch-clip-0"));
        assert!(markup.contains("page-swatch-clip-1"));
    }
}
