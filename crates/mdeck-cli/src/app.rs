//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mdeck_core::{DeckRenderer, RenderParams, RenderedDeck};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "mdeck")]
#[command(author, version, about = "Markdown notes in, slide decks out", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown note to a standalone HTML deck
    Render {
        /// Input markdown note
        input: PathBuf,

        /// Output HTML file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force print-mode layout for PDF export
        #[arg(long)]
        print_pdf: bool,

        /// Settings file (mdeck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Export a portable deck: HTML plus all referenced images
    Export {
        /// Input markdown note
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Settings file (mdeck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            print_pdf,
            config,
        } => {
            render_command(&input, output.as_deref(), print_pdf, config.as_deref())?;
        }
        Commands::Export {
            input,
            directory,
            config,
        } => {
            export_command(&input, directory.as_deref(), config.as_deref())?;
        }
    }

    Ok(())
}

fn build_renderer(settings: &Settings) -> DeckRenderer {
    DeckRenderer::new()
        .with_defaults(settings.slide_options())
        .with_theme_locations(settings.theme_locations())
}

/// Execute the render command
pub fn render_command(
    input: &Path,
    output: Option<&Path>,
    print_pdf: bool,
    config: Option<&Path>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let settings = Settings::load_or_default(config)?;
    let renderer = build_renderer(&settings);

    let params = RenderParams {
        export: false,
        print_pdf,
    };
    let deck = renderer
        .render_file(input, &params)
        .with_context(|| format!("Failed to render: {}", input.display()))?;

    match output {
        Some(path) => {
            println!("mdeck v{}", mdeck_core::VERSION);
            println!("Rendering: {}", input.display());
            fs::write(path, deck.html)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!("  Created: {}", path.display());
        }
        None => {
            // Raw HTML on stdout keeps the command pipeable
            print!("{}", deck.html);
        }
    }

    Ok(())
}

/// Execute the export command
pub fn export_command(input: &Path, directory: Option<&Path>, config: Option<&Path>) -> Result<()> {
    println!("mdeck v{}", mdeck_core::VERSION);
    println!("Exporting: {}", input.display());

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let settings = Settings::load_or_default(config)?;
    let renderer = build_renderer(&settings);

    let params = RenderParams {
        export: true,
        print_pdf: false,
    };
    let deck = renderer
        .render_file(input, &params)
        .with_context(|| format!("Failed to render: {}", input.display()))?;

    let target = directory
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.export_directory());
    write_deck(input, &deck, &target)?;

    println!();
    println!(
        "Export complete: 1 page, {} asset(s)",
        deck.assets.len()
    );
    Ok(())
}

/// Write the rendered page and its collected assets under `target`
fn write_deck(input: &Path, deck: &RenderedDeck, target: &Path) -> Result<()> {
    fs::create_dir_all(target)
        .with_context(|| format!("Failed to create output directory: {}", target.display()))?;

    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("deck");
    let page_path = target.join(format!("{}.html", stem));
    fs::write(&page_path, &deck.html)
        .with_context(|| format!("Failed to write page: {}", page_path.display()))?;
    println!("  Created: {}", page_path.display());

    if !deck.assets.is_empty() {
        let assets_dir = target.join("assets");
        fs::create_dir_all(&assets_dir).with_context(|| {
            format!(
                "Failed to create assets directory: {}",
                assets_dir.display()
            )
        })?;

        for asset in &deck.assets {
            let asset_path = assets_dir.join(&asset.id);
            fs::write(&asset_path, &asset.data)
                .with_context(|| format!("Failed to write asset: {}", asset_path.display()))?;
            println!("  Created: {}", asset_path.display());
        }
    }

    Ok(())
}
