//! Template rendering.
//!
//! The final page is produced by substituting a [`RenderContext`] into a
//! template source. The dialect is deliberately small:
//!
//! - `{{ name }}` substitutes a value verbatim
//! - `{{# name }}...{{/ name }}` renders the body when the value is a true
//!   bool or a non-empty string, and once per item for a list (with `{{.}}`
//!   bound to the current item)
//!
//! Missing variables render as nothing; a template never fails against a
//! context.

use hashlink::LinkedHashMap;
use regex::Regex;

/// A template variable value
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    String(String),
    Bool(bool),
    List(Vec<String>),
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for TemplateValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// The flat variable map handed to the templating service, read-only once
/// assembled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    values: LinkedHashMap<String, TemplateValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TemplateValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.values.get(name)
    }
}

/// Substitute a context into a template source.
pub fn render_template(source: &str, context: &RenderContext) -> String {
    render_block(source, context, None)
}

fn render_block(source: &str, context: &RenderContext, current: Option<&str>) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            output.push_str(&rest[open..]);
            return output;
        };
        let tag = after[..close].trim();
        let tail = &after[close + 2..];

        if let Some(name) = tag.strip_prefix('#') {
            let name = name.trim();
            let Some((body, remainder)) = split_section(tail, name) else {
                // Unterminated section: emit nothing for it
                return output;
            };
            output.push_str(&render_section(body, name, context));
            rest = remainder;
        } else if tag.starts_with('/') {
            // Stray closer; drop it
            rest = tail;
        } else {
            output.push_str(&substitute(tag, context, current));
            rest = tail;
        }
    }

    output.push_str(rest);
    output
}

/// Split a section body from the text following its opening tag
fn split_section<'t>(tail: &'t str, name: &str) -> Option<(&'t str, &'t str)> {
    let closer = Regex::new(&format!(r"\{{\{{\s*/\s*{}\s*\}}\}}", regex::escape(name))).ok()?;
    let found = closer.find(tail)?;
    Some((&tail[..found.start()], &tail[found.end()..]))
}

fn render_section(body: &str, name: &str, context: &RenderContext) -> String {
    match context.get(name) {
        Some(TemplateValue::Bool(true)) => render_block(body, context, None),
        Some(TemplateValue::String(s)) if !s.is_empty() => render_block(body, context, None),
        Some(TemplateValue::List(items)) => items
            .iter()
            .map(|item| render_block(body, context, Some(item)))
            .collect(),
        _ => String::new(),
    }
}

fn substitute(name: &str, context: &RenderContext, current: Option<&str>) -> String {
    if name == "." {
        return current.unwrap_or_default().to_string();
    }
    match context.get(name) {
        Some(TemplateValue::String(s)) => s.clone(),
        Some(TemplateValue::Bool(b)) => b.to_string(),
        Some(TemplateValue::List(items)) => items.join(","),
        None => String::new(),
    }
}
