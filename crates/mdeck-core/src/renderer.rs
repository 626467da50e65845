//! The deck renderer: orchestrates one render call end to end.
//!
//! A render is sequential and synchronous: front matter, preprocess,
//! segment, structural parse, transformer chain, optional asset collection,
//! template assembly. Anything that prevents producing output at all (an
//! unreadable source file) is fatal and propagates; everything smaller
//! degrades in place.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::assemble::{assemble, ThemeLocations};
use crate::collector::{AssetCollector, CollectedImage};
use crate::element::{TARGET_ATTR, TARGET_SLIDE};
use crate::error::{RenderError, Result};
use crate::html::HtmlWriter;
use crate::options::{parse_front_matter, EngineOptions, RenderMode, SlideOptions};
use crate::preprocess::PreprocessorPipeline;
use crate::segment::segment;
use crate::structure::{parse_fragment, ParsedFragment};
use crate::templating::render_template;
use crate::transform::TransformerChain;

/// Default deck template, embedded so rendering works out of the box
const DEFAULT_TEMPLATE: &str = include_str!("../assets/template.html");

/// Recognized render parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderParams {
    /// Collect assets and produce a portable deck
    pub export: bool,
    /// Force print-mode option overrides
    pub print_pdf: bool,
}

/// The outcome of one render call
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDeck {
    /// The complete page
    pub html: String,
    /// Collected images; empty outside export mode
    pub assets: Vec<CollectedImage>,
}

/// Renders notes into slide decks
pub struct DeckRenderer {
    defaults: SlideOptions,
    locations: ThemeLocations,
    template: String,
}

impl Default for DeckRenderer {
    fn default() -> Self {
        Self {
            defaults: SlideOptions::default(),
            locations: ThemeLocations::default(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl DeckRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the built-in option defaults (settings-file layer)
    pub fn with_defaults(mut self, defaults: SlideOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Point theme resolution at different asset directories
    pub fn with_theme_locations(mut self, locations: ThemeLocations) -> Self {
        self.locations = locations;
        self
    }

    /// Use a caller-supplied template source instead of the embedded one
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Render a note from disk.
    ///
    /// Export mode owns an [`AssetCollector`] for the duration of the call;
    /// its collected images come back on the [`RenderedDeck`].
    pub fn render_file(&self, path: &Path, params: &RenderParams) -> Result<RenderedDeck> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                RenderError::source_not_found(path.display().to_string())
            } else {
                RenderError::from(err)
            }
        })?;

        let doc_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let fallback_title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);

        let mut collector = params.export.then(|| {
            let mut collector = AssetCollector::new();
            collector.reset();
            collector.enable();
            collector
        });

        let mode = RenderMode {
            export: params.export,
            print: params.print_pdf,
        };
        let html = self.render_impl(
            &content,
            mode,
            collector.as_mut(),
            Some(&doc_dir),
            fallback_title,
        )?;

        let assets = match collector {
            Some(mut collector) => {
                collector.disable();
                collector.into_collected()
            }
            None => Vec::new(),
        };

        Ok(RenderedDeck { html, assets })
    }

    /// Render in-memory text (the live-preview path)
    pub fn render(&self, text: &str, for_print: bool) -> Result<String> {
        let mode = RenderMode {
            export: false,
            print: for_print,
        };
        self.render_impl(text, mode, None, None, None)
    }

    fn render_impl(
        &self,
        text: &str,
        mode: RenderMode,
        collector: Option<&mut AssetCollector>,
        doc_dir: Option<&Path>,
        fallback_title: Option<String>,
    ) -> Result<String> {
        let (front_matter, body) = parse_front_matter(text);
        let options = SlideOptions::resolve(&self.defaults, &front_matter, mode);
        let engine = EngineOptions::derive(&options);

        let processed = PreprocessorPipeline::new().process(&body);
        let group = segment(&processed, &engine);
        debug!(slides = group.len(), "segmented note");

        let chain = TransformerChain::new();
        let mut slides: Vec<Vec<ParsedFragment>> = Vec::with_capacity(group.len());
        for slide in &group.slides {
            let mut fragments = Vec::with_capacity(slide.fragments.len());
            for fragment_text in &slide.fragments {
                let mut fragment = parse_fragment(fragment_text, &engine);
                apply_default_background(&mut fragment, &options);
                chain.apply(&mut fragment.root);
                if let Some(notes) = &mut fragment.notes {
                    chain.apply(notes);
                }
                fragments.push(fragment);
            }
            slides.push(fragments);
        }

        let slides_html = HtmlWriter::new(collector, doc_dir).render_slides(&slides);

        let title = options
            .title
            .clone()
            .or(fallback_title)
            .unwrap_or_else(|| "Presentation".to_string());

        let context = assemble(&options, slides_html, title, mode.export, &self.locations)?;
        Ok(render_template(&self.template, &context))
    }
}

/// Deck-wide `bg` option: every slide without its own background directive
/// inherits the deck default.
fn apply_default_background(fragment: &mut ParsedFragment, options: &SlideOptions) {
    let Some(bg) = &options.bg else {
        return;
    };
    let props = &mut fragment.root.props;
    if props.get_attribute("bg").is_none() {
        props.add_attribute("bg", bg.clone());
        if props.get_attribute(TARGET_ATTR).is_none() {
            props.add_attribute(TARGET_ATTR, TARGET_SLIDE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_produces_complete_page() {
        let renderer = DeckRenderer::new();
        let html = renderer.render("# Hello\n", false).unwrap();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("Reveal.initialize"));
    }

    #[test]
    fn test_render_title_from_front_matter() {
        let renderer = DeckRenderer::new();
        let html = renderer
            .render("---\ntitle: Quarterly Review\n---\n# Intro\n", false)
            .unwrap();
        assert!(html.contains("<title>Quarterly Review</title>"));
    }

    #[test]
    fn test_render_file_title_falls_back_to_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kickoff.md");
        fs::write(&path, "# Agenda\n").unwrap();

        let deck = DeckRenderer::new()
            .render_file(&path, &RenderParams::default())
            .unwrap();
        assert!(deck.html.contains("<title>kickoff</title>"));
        assert!(deck.assets.is_empty());
    }

    #[test]
    fn test_render_file_missing_source_is_fatal() {
        let err = DeckRenderer::new()
            .render_file(Path::new("nope/missing.md"), &RenderParams::default())
            .unwrap_err();
        assert_eq!(err.code(), "DECK001");
    }

    #[test]
    fn test_export_collects_images() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("chart.png"), b"png-bytes").unwrap();
        let path = dir.path().join("deck.md");
        fs::write(&path, "# Data\n\n![chart](chart.png)\n").unwrap();

        let deck = DeckRenderer::new()
            .render_file(
                &path,
                &RenderParams {
                    export: true,
                    print_pdf: false,
                },
            )
            .unwrap();

        assert_eq!(deck.assets.len(), 1);
        assert_eq!(deck.assets[0].source, "chart.png");
        assert!(deck.html.contains(&format!("assets/{}", deck.assets[0].id)));
        assert!(!deck.html.contains("src=\"chart.png\""));
    }

    #[test]
    fn test_preview_does_not_collect() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("chart.png"), b"png-bytes").unwrap();
        let path = dir.path().join("deck.md");
        fs::write(&path, "![chart](chart.png)\n").unwrap();

        let deck = DeckRenderer::new()
            .render_file(&path, &RenderParams::default())
            .unwrap();

        assert!(deck.assets.is_empty());
        assert!(deck.html.contains("src=\"chart.png\""));
    }

    #[test]
    fn test_print_mode_forces_overrides() {
        let renderer = DeckRenderer::new();
        let html = renderer
            .render("---\ntransition: zoom\n---\n# A\n", true)
            .unwrap();
        assert!(html.contains("\"transition\":\"none\""));
        assert!(html.contains("\"view\":\"print\""));
    }

    #[test]
    fn test_deck_wide_background_option() {
        let renderer = DeckRenderer::new();
        let html = renderer
            .render("---\nbg: '#222222'\n---\n# A\n---\n# B\n", false)
            .unwrap();
        assert_eq!(html.matches("data-background-color=\"#222222\"").count(), 2);
    }

    #[test]
    fn test_slide_annotation_overrides_deck_background() {
        let renderer = DeckRenderer::new();
        let html = renderer
            .render(
                "---\nbg: '#222222'\n---\n<!-- slide: bg=\"#eeeeee\" -->\n\n# A\n",
                false,
            )
            .unwrap();
        assert!(html.contains("data-background-color=\"#eeeeee\""));
        assert!(!html.contains("data-background-color=\"#222222\""));
    }
}
