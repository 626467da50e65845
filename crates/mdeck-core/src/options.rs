//! Front-matter option parsing and layered resolution.
//!
//! A note may open with a fenced YAML metadata block:
//!
//! ```text
//! ---
//! theme: moon
//! transition: fade
//! ---
//! # First slide
//! ```
//!
//! Known keys land in typed fields on [`SlideOptions`]; unknown keys are kept
//! verbatim in an insertion-ordered pass-through map and forwarded to the
//! presentation engine, so the option surface stays extensible. Resolution is
//! a layered merge where later layers always win:
//! defaults < settings-supplied defaults < front matter < mode-forced keys.

use hashlink::LinkedHashMap;
use serde_yaml::Value;
use tracing::warn;

/// Render mode flags that force option overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderMode {
    /// Export mode: portable output, assets collected and rewritten
    pub export: bool,
    /// Print mode: single-page layout for PDF printing
    pub print: bool,
}

/// The resolved option set for one render
#[derive(Debug, Clone, PartialEq)]
pub struct SlideOptions {
    pub title: Option<String>,
    pub theme: String,
    pub highlight_theme: String,
    pub transition: String,
    pub transition_speed: String,
    pub controls: bool,
    pub progress: bool,
    pub slide_number: bool,
    pub overview: bool,
    pub menu: bool,
    pub chalkboard: bool,
    pub custom_controls: bool,
    /// Extra stylesheets, from a string (comma-separated) or a list
    pub css: Vec<String>,
    /// Horizontal slide separator line
    pub separator: String,
    /// Vertical sub-slide separator line
    pub vertical_separator: String,
    /// Speaker-notes separator prefix
    pub notes_separator: String,
    /// Whether speaker notes are retained in the output
    pub notes: bool,
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    /// Deck-wide default background directive
    pub bg: Option<String>,
    /// Unknown keys, passed through to the engine options blob untouched
    pub extra: LinkedHashMap<String, Value>,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            title: None,
            theme: "black".to_string(),
            highlight_theme: "zenburn".to_string(),
            transition: "slide".to_string(),
            transition_speed: "default".to_string(),
            controls: true,
            progress: true,
            slide_number: false,
            overview: false,
            menu: false,
            chalkboard: false,
            custom_controls: false,
            css: Vec::new(),
            separator: "---".to_string(),
            vertical_separator: "--".to_string(),
            notes_separator: "note:".to_string(),
            notes: true,
            width: 960,
            height: 700,
            margin: 0.04,
            bg: None,
            extra: LinkedHashMap::new(),
        }
    }
}

impl SlideOptions {
    /// Resolve the final option set for one render.
    ///
    /// `base` carries the caller's defaults (settings file or built-ins),
    /// `front_matter` is the parsed document metadata, `mode` forces the last
    /// layer of overrides.
    pub fn resolve(base: &SlideOptions, front_matter: &Mapping, mode: RenderMode) -> SlideOptions {
        let mut options = base.clone();
        options.apply_mapping(front_matter);
        options.apply_mode(mode);
        options
    }

    /// Fold a front-matter mapping over this option set
    fn apply_mapping(&mut self, mapping: &Mapping) {
        for (key, value) in mapping {
            match key.as_str() {
                "title" => self.title = as_string(value).or(self.title.take()),
                "theme" => set_string(&mut self.theme, value),
                "highlightTheme" => set_string(&mut self.highlight_theme, value),
                "transition" => set_string(&mut self.transition, value),
                "transitionSpeed" => set_string(&mut self.transition_speed, value),
                "controls" => set_bool(&mut self.controls, value),
                "progress" => set_bool(&mut self.progress, value),
                "slideNumber" => set_bool(&mut self.slide_number, value),
                "overview" => set_bool(&mut self.overview, value),
                "menu" => set_bool(&mut self.menu, value),
                "chalkboard" => set_bool(&mut self.chalkboard, value),
                "customControls" => set_bool(&mut self.custom_controls, value),
                "css" => self.css = as_string_list(value),
                "separator" => set_string(&mut self.separator, value),
                "verticalSeparator" => set_string(&mut self.vertical_separator, value),
                "notesSeparator" => set_string(&mut self.notes_separator, value),
                "notes" => set_bool(&mut self.notes, value),
                "width" => set_u32(&mut self.width, value),
                "height" => set_u32(&mut self.height, value),
                "margin" => set_f64(&mut self.margin, value),
                "bg" => self.bg = as_string(value).or(self.bg.take()),
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Apply mode-forced keys. These always win over front matter.
    fn apply_mode(&mut self, mode: RenderMode) {
        if mode.print {
            // Single-page layout for PDF printing
            self.transition = "none".to_string();
            self.extra
                .insert("view".to_string(), Value::String("print".to_string()));
        }
        if mode.export {
            // Portable decks keep fragment state out of the exported pages
            self.extra
                .insert("embedded".to_string(), Value::Bool(true));
        }
    }

    /// Serialize the engine-facing subset (plus pass-through keys) into one
    /// embeddable JSON configuration blob.
    pub fn engine_options_json(&self) -> crate::error::Result<String> {
        let mut engine = serde_json::Map::new();
        engine.insert("controls".into(), self.controls.into());
        engine.insert("progress".into(), self.progress.into());
        engine.insert("slideNumber".into(), self.slide_number.into());
        engine.insert("overview".into(), self.overview.into());
        engine.insert("transition".into(), self.transition.clone().into());
        engine.insert(
            "transitionSpeed".into(),
            self.transition_speed.clone().into(),
        );
        engine.insert("width".into(), self.width.into());
        engine.insert("height".into(), self.height.into());
        engine.insert("margin".into(), self.margin.into());

        for (key, value) in &self.extra {
            engine.insert(key.clone(), yaml_to_json(value));
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(engine))?)
    }
}

/// A parsed front-matter mapping (key order preserved)
pub type Mapping = LinkedHashMap<String, Value>;

/// Split a document into its front-matter options and body.
///
/// The metadata block is a fenced region at the very start of the document
/// delimited by `---` lines. A missing block yields empty options and the raw
/// text unchanged. A malformed block degrades the same way: rendering must
/// always produce output, so the YAML error is logged and the full text is
/// treated as body.
pub fn parse_front_matter(raw: &str) -> (Mapping, String) {
    let Some((yaml, body)) = split_front_matter(raw) else {
        return (Mapping::new(), raw.to_string());
    };

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => {
            let mut options = Mapping::new();
            for (key, value) in mapping {
                if let Value::String(key) = key {
                    options.insert(key, value);
                }
            }
            (options, body.to_string())
        }
        Ok(_) => {
            warn!("front matter is not a mapping; ignoring");
            (Mapping::new(), body.to_string())
        }
        Err(err) => {
            warn!("malformed front matter ({err}); rendering without options");
            (Mapping::new(), raw.to_string())
        }
    }
}

/// Locate the leading `---` fenced block. Returns (yaml, body) on success.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;

    for (offset, line) in line_spans(rest) {
        if line.trim_end_matches('\r') == "---" {
            let yaml = &rest[..offset];
            let body_start = offset + line.len();
            let body = rest[body_start..].strip_prefix('\n').unwrap_or(&rest[body_start..]);
            return Some((yaml, body));
        }
    }
    None
}

/// Iterate lines with their byte offsets, line content excluding the `\n`
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |chunk| {
        let start = offset;
        offset += chunk.len();
        (start, chunk.strip_suffix('\n').unwrap_or(chunk))
    })
}

/// The subset of options the segmenter and structural parser understand
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub separator: String,
    pub vertical_separator: String,
    pub notes_separator: String,
    pub keep_notes: bool,
}

impl EngineOptions {
    /// Project the merged option set down to the engine-facing keys
    pub fn derive(options: &SlideOptions) -> Self {
        Self {
            separator: options.separator.clone(),
            vertical_separator: options.vertical_separator.clone(),
            notes_separator: options.notes_separator.clone(),
            keep_notes: options.notes,
        }
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Value::Sequence(items) => items.iter().filter_map(as_string).collect(),
        _ => Vec::new(),
    }
}

fn set_string(target: &mut String, value: &Value) {
    if let Some(s) = as_string(value) {
        *target = s;
    }
}

fn set_bool(target: &mut bool, value: &Value) {
    if let Value::Bool(b) = value {
        *target = *b;
    }
}

fn set_u32(target: &mut u32, value: &Value) {
    if let Some(n) = value.as_u64() {
        *target = n as u32;
    }
}

fn set_f64(target: &mut f64, value: &Value) {
    if let Some(n) = value.as_f64() {
        *target = n;
    }
}

/// Convert a pass-through YAML value into JSON for the engine blob
fn yaml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            } else {
                serde_json::Value::Null
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(yaml_to_json).collect())
        }
        Value::Mapping(mapping) => {
            let mut object = serde_json::Map::new();
            for (key, value) in mapping {
                if let Value::String(key) = key {
                    object.insert(key.clone(), yaml_to_json(value));
                }
            }
            serde_json::Value::Object(object)
        }
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
