//! Settings file support.
//!
//! A `mdeck.toml` next to the notes (or passed via `--config`) supplies
//! default slide options and asset directories. Settings sit below document
//! front matter in the option layering: the note always wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use mdeck_core::{SlideOptions, ThemeLocations};

/// CLI-level settings, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub theme: Option<String>,
    pub highlight_theme: Option<String>,
    pub transition: Option<String>,
    pub transition_speed: Option<String>,
    pub controls: Option<bool>,
    pub progress: Option<bool>,
    pub slide_number: Option<bool>,
    pub overview: Option<bool>,
    pub menu: Option<bool>,
    pub chalkboard: Option<bool>,
    /// Where `mdeck export` writes by default
    pub export_directory: Option<PathBuf>,
    /// Theme stylesheet directory
    pub theme_directory: Option<PathBuf>,
    /// Highlight stylesheet directory
    pub highlight_directory: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Load settings when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay these settings onto the built-in option defaults
    pub fn slide_options(&self) -> SlideOptions {
        let mut options = SlideOptions::default();
        if let Some(theme) = &self.theme {
            options.theme = theme.clone();
        }
        if let Some(highlight_theme) = &self.highlight_theme {
            options.highlight_theme = highlight_theme.clone();
        }
        if let Some(transition) = &self.transition {
            options.transition = transition.clone();
        }
        if let Some(speed) = &self.transition_speed {
            options.transition_speed = speed.clone();
        }
        if let Some(controls) = self.controls {
            options.controls = controls;
        }
        if let Some(progress) = self.progress {
            options.progress = progress;
        }
        if let Some(slide_number) = self.slide_number {
            options.slide_number = slide_number;
        }
        if let Some(overview) = self.overview {
            options.overview = overview;
        }
        if let Some(menu) = self.menu {
            options.menu = menu;
        }
        if let Some(chalkboard) = self.chalkboard {
            options.chalkboard = chalkboard;
        }
        options
    }

    /// Theme directories for stylesheet resolution
    pub fn theme_locations(&self) -> ThemeLocations {
        let mut locations = ThemeLocations::default();
        if let Some(dir) = &self.theme_directory {
            locations.themes = dir.clone();
        }
        if let Some(dir) = &self.highlight_directory {
            locations.highlight = dir.clone();
        }
        locations
    }

    /// Export target directory, with the built-in default
    pub fn export_directory(&self) -> PathBuf {
        self.export_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("export"))
    }
}
