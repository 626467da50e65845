//! Theme resolution and render-context assembly.
//!
//! Turns the merged option set plus the generated slide markup into the flat
//! variable map the templating service consumes. Theme names degrade rather
//! than fail: an unresolvable name passes through unchanged and at worst
//! yields a broken stylesheet link in the preview.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

use crate::error::Result;
use crate::html::is_absolute_url;
use crate::options::SlideOptions;
use crate::templating::RenderContext;

/// Where theme and highlight stylesheets live on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeLocations {
    pub themes: PathBuf,
    pub highlight: PathBuf,
}

impl Default for ThemeLocations {
    fn default() -> Self {
        Self {
            themes: PathBuf::from("dist/theme"),
            highlight: PathBuf::from("plugin/highlight"),
        }
    }
}

/// Resolve a theme name to a stylesheet location.
///
/// An absolute URL is accepted unchanged. Otherwise the directory is
/// searched for a stylesheet whose base name matches; no match falls back to
/// the raw name (broken-but-non-fatal reference).
pub fn resolve_stylesheet(name: &str, dir: &Path) -> String {
    if is_absolute_url(name) {
        return name.to_string();
    }

    let pattern = dir.join("*.css");
    let candidates = match glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(err) => {
            warn!("bad theme glob pattern {} ({err})", pattern.display());
            return name.to_string();
        }
    };

    for path in candidates.flatten() {
        let stem = path.file_stem().and_then(|stem| stem.to_str());
        if stem == Some(name) {
            return path.to_string_lossy().into_owned();
        }
    }

    warn!("theme '{}' not found under {}", name, dir.display());
    name.to_string()
}

/// Build the render context for one deck.
pub fn assemble(
    options: &SlideOptions,
    slides_html: String,
    title: String,
    export: bool,
    locations: &ThemeLocations,
) -> Result<RenderContext> {
    let theme_url = resolve_stylesheet(&options.theme, &locations.themes);
    let highlight_url = resolve_stylesheet(&options.highlight_theme, &locations.highlight);

    // Exported decks must stay filesystem-portable
    let base = if export { "" } else { "/" };

    let mut context = RenderContext::new();
    context.insert("title", title);
    context.insert("slides", slides_html);
    context.insert("themeUrl", theme_url);
    context.insert("highlightThemeUrl", highlight_url);
    context.insert("cssPaths", options.css.clone());
    context.insert("base", base);
    context.insert("enableChalkboard", options.chalkboard);
    context.insert("enableOverview", options.overview);
    context.insert("enableMenu", options.menu);
    context.insert("enableCustomControls", options.custom_controls);
    context.insert("engineOptions", options.engine_options_json()?);

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templating::TemplateValue;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_absolute_url_unchanged() {
        let url = "https://cdn.example.com/night.css";
        assert_eq!(resolve_stylesheet(url, Path::new("missing")), url);
    }

    #[test]
    fn test_matching_stylesheet_resolved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("moon.css"), "/* */").unwrap();
        fs::write(dir.path().join("black.css"), "/* */").unwrap();

        let resolved = resolve_stylesheet("moon", dir.path());
        assert!(resolved.ends_with("moon.css"));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("black.css"), "/* */").unwrap();

        assert_eq!(resolve_stylesheet("nonexistent", dir.path()), "nonexistent");
    }

    #[test]
    fn test_missing_directory_falls_back() {
        assert_eq!(
            resolve_stylesheet("moon", Path::new("does/not/exist")),
            "moon"
        );
    }

    #[test]
    fn test_assemble_base_path_by_mode() {
        let options = SlideOptions::default();
        let locations = ThemeLocations::default();

        let preview = assemble(
            &options,
            String::new(),
            "t".into(),
            false,
            &locations,
        )
        .unwrap();
        assert_eq!(preview.get("base"), Some(&TemplateValue::String("/".into())));

        let export = assemble(&options, String::new(), "t".into(), true, &locations).unwrap();
        assert_eq!(export.get("base"), Some(&TemplateValue::String("".into())));
    }

    #[test]
    fn test_assemble_engine_options_blob() {
        let options = SlideOptions::default();
        let context = assemble(
            &options,
            String::new(),
            "t".into(),
            false,
            &ThemeLocations::default(),
        )
        .unwrap();

        match context.get("engineOptions") {
            Some(TemplateValue::String(json)) => {
                assert!(json.contains("\"controls\":true"));
                assert!(json.contains("\"transition\":\"slide\""));
            }
            other => panic!("expected engine options string, got {:?}", other),
        }
    }
}
