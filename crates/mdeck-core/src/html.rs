//! HTML generation from the transformed element tree.
//!
//! Produces the slide markup that the template assembler embeds into the
//! final page: one `<section>` per slide, with vertically-navigated
//! fragments nested as inner sections. Image references pass through the
//! export collector when one is active, so export-aware rewriting happens
//! transparently inside the generic rendering path.

use std::fmt::Write;
use std::path::Path;

use crate::collector::AssetCollector;
use crate::element::{ElementKind, ElementNode, Properties, TARGET_ATTR};
use crate::structure::ParsedFragment;

/// Writes transformed fragments as presentation HTML
pub struct HtmlWriter<'a> {
    output: String,
    collector: Option<&'a mut AssetCollector>,
    doc_dir: Option<&'a Path>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(collector: Option<&'a mut AssetCollector>, doc_dir: Option<&'a Path>) -> Self {
        Self {
            output: String::new(),
            collector,
            doc_dir,
        }
    }

    /// Render a whole deck: one outer section per slide, inner sections for
    /// vertical fragments.
    pub fn render_slides(mut self, slides: &[Vec<ParsedFragment>]) -> String {
        for fragments in slides {
            match fragments.len() {
                0 => {}
                1 => self.write_section(&fragments[0]),
                _ => {
                    self.output.push_str("<section>\n");
                    for fragment in fragments {
                        self.write_section(fragment);
                    }
                    self.output.push_str("</section>\n");
                }
            }
        }
        self.output
    }

    fn write_section(&mut self, fragment: &ParsedFragment) {
        self.output.push_str("<section");
        self.write_props(&fragment.root.props);
        self.output.push_str(">\n");

        for child in &fragment.root.children {
            self.write_element(child);
        }

        if let Some(notes) = &fragment.notes {
            self.output.push_str("<aside class=\"notes\">\n");
            for child in &notes.children {
                self.write_element(child);
            }
            self.output.push_str("</aside>\n");
        }

        self.output.push_str("</section>\n");
    }

    fn write_element(&mut self, node: &ElementNode) {
        match &node.kind {
            ElementKind::Root => {
                for child in &node.children {
                    self.write_element(child);
                }
            }
            ElementKind::Heading(level) => {
                let tag = format!("h{}", (*level).clamp(1, 6));
                self.write_container(&tag, node, false);
            }
            ElementKind::Paragraph => self.write_container("p", node, false),
            ElementKind::Text(text) => self.output.push_str(&escape_html(text)),
            ElementKind::Emphasis => self.write_container("em", node, true),
            ElementKind::Strong => self.write_container("strong", node, true),
            ElementKind::Strikethrough => self.write_container("del", node, true),
            ElementKind::InlineCode(literal) => {
                self.output.push_str("<code>");
                self.output.push_str(&escape_html(literal));
                self.output.push_str("</code>");
            }
            ElementKind::CodeBlock { language, literal } => {
                self.output.push_str("<pre");
                self.write_props(&node.props);
                self.output.push_str("><code");
                if let Some(language) = language {
                    write!(
                        self.output,
                        " class=\"language-{}\"",
                        escape_attribute(language)
                    )
                    .unwrap();
                }
                self.output.push('>');
                self.output.push_str(&escape_html(literal));
                self.output.push_str("</code></pre>\n");
            }
            ElementKind::List { ordered, start } => {
                let tag = if *ordered { "ol" } else { "ul" };
                self.output.push('<');
                self.output.push_str(tag);
                if *ordered && *start > 1 {
                    write!(self.output, " start=\"{}\"", start).unwrap();
                }
                self.write_props(&node.props);
                self.output.push_str(">\n");
                for child in &node.children {
                    self.write_element(child);
                }
                write!(self.output, "</{}>\n", tag).unwrap();
            }
            ElementKind::ListItem => self.write_container("li", node, false),
            ElementKind::BlockQuote => self.write_container("blockquote", node, false),
            ElementKind::Image { url, title } => {
                let src = self.resolve_image(url);
                self.output.push_str("<img src=\"");
                self.output.push_str(&escape_attribute(&src));
                self.output.push('"');

                let alt = plain_text(node);
                write!(self.output, " alt=\"{}\"", escape_attribute(&alt)).unwrap();
                if !title.is_empty() {
                    write!(self.output, " title=\"{}\"", escape_attribute(title)).unwrap();
                }
                self.write_props(&node.props);
                self.output.push_str(" />");
            }
            ElementKind::Link { url, title } => {
                self.output.push_str("<a href=\"");
                self.output.push_str(&escape_attribute(url));
                self.output.push('"');
                if !title.is_empty() {
                    write!(self.output, " title=\"{}\"", escape_attribute(title)).unwrap();
                }
                self.write_props(&node.props);
                self.output.push('>');
                for child in &node.children {
                    self.write_element(child);
                }
                self.output.push_str("</a>");
            }
            ElementKind::HtmlBlock(raw) => {
                self.output.push_str(raw);
                if !raw.ends_with('\n') {
                    self.output.push('\n');
                }
            }
            ElementKind::HtmlInline(raw) => self.output.push_str(raw),
            ElementKind::SoftBreak => self.output.push('\n'),
            ElementKind::LineBreak => self.output.push_str("<br />\n"),
            ElementKind::ThematicBreak => self.output.push_str("<hr />\n"),
        }
    }

    fn write_container(&mut self, tag: &str, node: &ElementNode, inline: bool) {
        self.output.push('<');
        self.output.push_str(tag);
        self.write_props(&node.props);
        self.output.push('>');
        for child in &node.children {
            self.write_element(child);
        }
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
        if !inline {
            self.output.push('\n');
        }
    }

    fn write_props(&mut self, props: &Properties) {
        for (key, value) in props.attributes() {
            if key == TARGET_ATTR {
                continue;
            }
            write!(self.output, " {}=\"{}\"", key, escape_attribute(value)).unwrap();
        }

        if !props.classes().is_empty() {
            write!(
                self.output,
                " class=\"{}\"",
                escape_attribute(&props.classes().join(" "))
            )
            .unwrap();
        }

        let style: Vec<String> = props
            .styles()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();
        if !style.is_empty() {
            write!(
                self.output,
                " style=\"{}\"",
                escape_attribute(&style.join("; "))
            )
            .unwrap();
        }
    }

    /// Route an image reference through the export collector when active.
    /// Absolute URLs are never collected.
    fn resolve_image(&mut self, src: &str) -> String {
        if is_absolute_url(src) {
            return src.to_string();
        }
        match (&mut self.collector, self.doc_dir) {
            (Some(collector), Some(doc_dir)) if collector.should_collect() => {
                collector.collect(src, doc_dir)
            }
            _ => src.to_string(),
        }
    }
}

/// Whether a reference is already a well-formed absolute URL
pub fn is_absolute_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return value.starts_with("data:");
    };
    !rest.is_empty()
        && !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Escape text content for HTML
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value for HTML
pub fn escape_attribute(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Collect the plain text of a subtree (image alt text)
fn plain_text(node: &ElementNode) -> String {
    let mut result = String::new();
    collect_text(node, &mut result);
    result
}

fn collect_text(node: &ElementNode, into: &mut String) {
    if let ElementKind::Text(text) = &node.kind {
        into.push_str(text);
    }
    for child in &node.children {
        collect_text(child, into);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EngineOptions, SlideOptions};
    use crate::structure::parse_fragment;
    use crate::transform::TransformerChain;

    fn render(text: &str) -> String {
        let engine = EngineOptions::derive(&SlideOptions::default());
        let mut fragment = parse_fragment(text, &engine);
        TransformerChain::new().apply(&mut fragment.root);
        if let Some(notes) = &mut fragment.notes {
            TransformerChain::new().apply(notes);
        }
        HtmlWriter::new(None, None).render_slides(&[vec![fragment]])
    }

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("# Title\n\nBody\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.starts_with("<section>"));
        assert!(html.trim_end().ends_with("</section>"));
    }

    #[test]
    fn test_slide_annotation_on_section_tag() {
        let html = render("<!-- slide: bg=\"#000000\" -->\n\n# Dark\n");
        assert!(html.contains("data-background-color=\"#000000\""));
        assert!(html.contains("class=\"has-dark-background\""));
        // The internal target marker never leaks into output
        assert!(!html.contains(TARGET_ATTR));
    }

    #[test]
    fn test_code_block_rendering() {
        let html = render("```rust\nlet x = 1 < 2;\n```\n");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
        assert!(html.contains("let x = 1 &lt; 2;"));
    }

    #[test]
    fn test_inline_formatting() {
        let html = render("*em* **strong** `code`\n");
        assert!(html.contains("<em>em</em>"));
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_lists() {
        let html = render("- one\n- two\n");
        assert!(html.contains("<ul>"));
        assert_eq!(html.matches("<li>").count(), 2);

        let html = render("1. one\n2. two\n");
        assert!(html.contains("<ol>"));
    }

    #[test]
    fn test_image_with_size_directive() {
        let html = render("![diagram](img/arch.png) <!-- element: w=\"400\" -->\n");
        assert!(html.contains("src=\"img/arch.png\""));
        assert!(html.contains("alt=\"diagram\""));
        assert!(html.contains("style=\"width: 400px\""));
    }

    #[test]
    fn test_link_rendering() {
        let html = render("[docs](https://example.com)\n");
        assert!(html.contains("<a href=\"https://example.com\">docs</a>"));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let html = render("<div class=\"block\">\n\ninner\n\n</div>\n");
        assert!(html.contains("<div class=\"block\">"));
        assert!(html.contains("</div>"));
    }

    #[test]
    fn test_notes_rendered_as_aside() {
        let html = render("# Slide\n\nnote: speaker only\n");
        assert!(html.contains("<aside class=\"notes\">"));
        assert!(html.contains("speaker only"));
    }

    #[test]
    fn test_vertical_fragments_nest_sections() {
        let engine = EngineOptions::derive(&SlideOptions::default());
        let first = parse_fragment("top\n", &engine);
        let second = parse_fragment("bottom\n", &engine);
        let html = HtmlWriter::new(None, None).render_slides(&[vec![first, second]]);

        assert_eq!(html.matches("<section").count(), 3);
        assert_eq!(html.matches("</section>").count(), 3);
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com/theme.css"));
        assert!(is_absolute_url("http://x/y"));
        assert!(is_absolute_url("data:image/png;base64,xyz"));
        assert!(!is_absolute_url("images/photo.png"));
        assert!(!is_absolute_url("moon"));
        assert!(!is_absolute_url("://broken"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
    }
}
