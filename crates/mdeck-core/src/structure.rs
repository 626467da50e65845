//! Structural parsing: fragment text to element tree.
//!
//! The markdown grammar itself is delegated to comrak; this module converts
//! the arena AST into an owned [`ElementNode`] tree and captures directive
//! annotations along the way:
//!
//! - `<!-- slide: key="value" ... -->` attaches its pairs to the fragment
//!   root, marked as slide-scoped
//! - `<!-- element: key="value" ... -->` attaches its pairs to the nearest
//!   preceding element (or the enclosing one when there is none)
//!
//! Annotations are consumed; they never appear in the output tree. Pairs that
//! cannot be read are ignored, never an error.
//!
//! Speaker-note content (from the notes-separator line to the end of the
//! fragment) is split off before the markdown parse and returned as its own
//! tree.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use regex::Regex;
use std::sync::OnceLock;

use crate::element::{ElementKind, ElementNode, TARGET_ATTR, TARGET_SLIDE};
use crate::options::EngineOptions;
use crate::preprocess::FenceScanner;

/// The parse result for one slide fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFragment {
    /// Fragment content; root properties land on the `<section>` element
    pub root: ElementNode,
    /// Speaker notes, when present and retained
    pub notes: Option<ElementNode>,
}

/// Parse one fragment of markdown into an element tree.
pub fn parse_fragment(text: &str, engine: &EngineOptions) -> ParsedFragment {
    let (body, notes) = split_notes(text, &engine.notes_separator);

    let root = parse_tree(&body);
    let notes = match notes {
        Some(notes_text) if engine.keep_notes => Some(parse_tree(&notes_text)),
        _ => None,
    };

    ParsedFragment { root, notes }
}

/// Parse markdown text into an element tree rooted at [`ElementKind::Root`].
fn parse_tree(text: &str) -> ElementNode {
    let arena = Arena::new();
    let options = Options::default();
    let ast = parse_document(&arena, text, &options);

    let mut root = ElementNode::new(ElementKind::Root);
    let mut builder = TreeBuilder::default();
    builder.convert_children(ast, &mut root);

    for (key, value) in builder.slide_attrs {
        root.props.add_attribute(key, value);
    }
    if root.props.attributes().count() > 0 || !root.props.classes().is_empty() {
        // Directives on the root always target the slide
        root.props.add_attribute(TARGET_ATTR, TARGET_SLIDE);
    }

    root
}

/// Split fragment text at the notes separator (outside code fences).
fn split_notes(text: &str, separator: &str) -> (String, Option<String>) {
    let separator = separator.trim().to_ascii_lowercase();
    if separator.is_empty() {
        return (text.to_string(), None);
    }

    let mut scanner = FenceScanner::new();
    let mut body = String::new();
    let mut lines = text.lines();

    for line in lines.by_ref() {
        let inside = scanner.observe(line);
        if !inside {
            let trimmed = line.trim_start();
            if trimmed.to_ascii_lowercase().starts_with(&separator) {
                let mut notes = trimmed[separator.len()..].trim_start().to_string();
                for rest in lines {
                    notes.push('\n');
                    notes.push_str(rest);
                }
                return (body, Some(notes));
            }
        }
        body.push_str(line);
        body.push('\n');
    }

    (body, None)
}

/// Converts comrak AST nodes, accumulating slide-scoped annotation pairs
#[derive(Default)]
struct TreeBuilder {
    slide_attrs: Vec<(String, String)>,
}

impl TreeBuilder {
    fn convert_children<'a>(&mut self, ast: &'a AstNode<'a>, parent: &mut ElementNode) {
        for child in ast.children() {
            let value = child.data.borrow().value.clone();
            match value {
                NodeValue::HtmlBlock(html) => {
                    if let Some(annotation) = parse_annotation(&html.literal) {
                        self.apply_annotation(annotation, parent);
                    } else {
                        parent.push(ElementNode::new(ElementKind::HtmlBlock(
                            html.literal.clone(),
                        )));
                    }
                }
                NodeValue::HtmlInline(literal) => {
                    if let Some(annotation) = parse_annotation(&literal) {
                        self.apply_annotation(annotation, parent);
                    } else {
                        parent.push(ElementNode::new(ElementKind::HtmlInline(literal)));
                    }
                }
                _ => {
                    if let Some(kind) = element_kind(&value) {
                        let mut element = ElementNode::new(kind);
                        self.convert_children(child, &mut element);
                        parent.push(element);
                    } else {
                        // Unhandled structural kinds: keep their children
                        self.convert_children(child, parent);
                    }
                }
            }
        }
    }

    fn apply_annotation(&mut self, annotation: Annotation, parent: &mut ElementNode) {
        match annotation.target {
            AnnotationTarget::Slide => self.slide_attrs.extend(annotation.pairs),
            AnnotationTarget::Element => {
                let receiver = match previous_element(parent) {
                    Some(element) => element,
                    None => parent,
                };
                for (key, value) in annotation.pairs {
                    receiver.props.add_attribute(key, value);
                }
            }
        }
    }
}

/// The nearest preceding sibling that can carry attributes
fn previous_element(parent: &mut ElementNode) -> Option<&mut ElementNode> {
    parent.children.iter_mut().rev().find(|child| {
        !matches!(
            child.kind,
            ElementKind::Text(_) | ElementKind::SoftBreak | ElementKind::LineBreak
        )
    })
}

fn element_kind(value: &NodeValue) -> Option<ElementKind> {
    Some(match value {
        NodeValue::Heading(heading) => ElementKind::Heading(heading.level),
        NodeValue::Paragraph => ElementKind::Paragraph,
        NodeValue::Text(text) => ElementKind::Text(text.to_string()),
        NodeValue::Emph => ElementKind::Emphasis,
        NodeValue::Strong => ElementKind::Strong,
        NodeValue::Strikethrough => ElementKind::Strikethrough,
        NodeValue::Code(code) => ElementKind::InlineCode(code.literal.clone()),
        NodeValue::CodeBlock(block) => ElementKind::CodeBlock {
            language: block
                .info
                .split_whitespace()
                .next()
                .map(str::to_string)
                .filter(|lang| !lang.is_empty()),
            literal: block.literal.clone(),
        },
        NodeValue::List(list) => ElementKind::List {
            ordered: list.list_type == ListType::Ordered,
            start: list.start,
        },
        NodeValue::Item(_) => ElementKind::ListItem,
        NodeValue::BlockQuote => ElementKind::BlockQuote,
        NodeValue::Image(link) => ElementKind::Image {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Link(link) => ElementKind::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::SoftBreak => ElementKind::SoftBreak,
        NodeValue::LineBreak => ElementKind::LineBreak,
        NodeValue::ThematicBreak => ElementKind::ThematicBreak,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AnnotationTarget {
    Slide,
    Element,
}

#[derive(Debug)]
struct Annotation {
    target: AnnotationTarget,
    pairs: Vec<(String, String)>,
}

fn annotation_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^<!--\s*\.?(slide|element):\s*(.*?)\s*-->$").unwrap()
    })
}

fn pair_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|(\S+))"#).unwrap()
    })
}

/// Recognize a directive annotation comment. Returns `None` for ordinary
/// HTML, which passes through to the tree untouched.
fn parse_annotation(literal: &str) -> Option<Annotation> {
    let captures = annotation_regex().captures(literal.trim())?;
    let target = match &captures[1] {
        "slide" => AnnotationTarget::Slide,
        _ => AnnotationTarget::Element,
    };

    let pairs = pair_regex()
        .captures_iter(captures.get(2).unwrap().as_str())
        .map(|pair| {
            let key = pair[1].to_string();
            let value = pair
                .get(2)
                .or_else(|| pair.get(3))
                .or_else(|| pair.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (key, value)
        })
        .collect();

    Some(Annotation { target, pairs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SlideOptions;

    fn engine() -> EngineOptions {
        EngineOptions::derive(&SlideOptions::default())
    }

    fn parse(text: &str) -> ParsedFragment {
        parse_fragment(text, &engine())
    }

    #[test]
    fn test_heading_and_paragraph() {
        let fragment = parse("# Title\n\nBody text\n");
        assert_eq!(fragment.root.children.len(), 2);
        assert_eq!(fragment.root.children[0].kind, ElementKind::Heading(1));
        assert_eq!(fragment.root.children[1].kind, ElementKind::Paragraph);
    }

    #[test]
    fn test_slide_annotation_lands_on_root() {
        let fragment = parse("<!-- slide: bg=\"#ff0000\" -->\n\n# Title\n");
        assert_eq!(fragment.root.props.get_attribute("bg"), Some("#ff0000"));
        assert!(fragment.root.props.targets_slide());
        // The annotation itself is consumed
        assert!(!fragment
            .root
            .children
            .iter()
            .any(|c| matches!(c.kind, ElementKind::HtmlBlock(_))));
    }

    #[test]
    fn test_element_annotation_attaches_to_previous() {
        let fragment = parse("a paragraph\n\n<!-- element: class=\"red\" -->\n");
        let para = &fragment.root.children[0];
        assert_eq!(para.kind, ElementKind::Paragraph);
        assert_eq!(para.props.get_attribute("class"), Some("red"));
    }

    #[test]
    fn test_inline_element_annotation_targets_image() {
        let fragment = parse("![](photo.png) <!-- element: w=\"300\" -->\n");
        let para = &fragment.root.children[0];
        let image = para
            .children
            .iter()
            .find(|c| matches!(c.kind, ElementKind::Image { .. }))
            .unwrap();
        assert_eq!(image.props.get_attribute("w"), Some("300"));
    }

    #[test]
    fn test_inline_annotation_without_preceding_element_hits_parent() {
        let fragment = parse("just text <!-- element: color=\"red\" -->\n");
        let para = &fragment.root.children[0];
        assert_eq!(para.props.get_attribute("color"), Some("red"));
    }

    #[test]
    fn test_unquoted_and_multiple_pairs() {
        let fragment = parse("<!-- slide: bg=red frag=1 -->\n\nx\n");
        assert_eq!(fragment.root.props.get_attribute("bg"), Some("red"));
        assert_eq!(fragment.root.props.get_attribute("frag"), Some("1"));
    }

    #[test]
    fn test_ordinary_html_passes_through() {
        let fragment = parse("<div class=\"block\">\n\ntext\n\n</div>\n");
        assert!(fragment
            .root
            .children
            .iter()
            .any(|c| matches!(c.kind, ElementKind::HtmlBlock(_))));
    }

    #[test]
    fn test_code_block_language() {
        let fragment = parse("```rust\nfn main() {}\n```\n");
        match &fragment.root.children[0].kind {
            ElementKind::CodeBlock { language, literal } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert!(literal.contains("fn main"));
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_notes_split_off() {
        let fragment = parse("# Slide\n\nnote: remember to smile\nand breathe\n");
        assert!(fragment.notes.is_some());
        let notes = fragment.notes.unwrap();
        assert!(!notes.children.is_empty());
        // The body no longer carries the notes text
        assert_eq!(fragment.root.children.len(), 1);
    }

    #[test]
    fn test_notes_dropped_when_not_retained() {
        let mut options = SlideOptions::default();
        options.notes = false;
        let engine = EngineOptions::derive(&options);

        let fragment = parse_fragment("# Slide\n\nnote: hidden\n", &engine);
        assert!(fragment.notes.is_none());
    }

    #[test]
    fn test_notes_separator_inside_fence_ignored() {
        let fragment = parse("```\nnote: literal\n```\n");
        assert!(fragment.notes.is_none());
        match &fragment.root.children[0].kind {
            ElementKind::CodeBlock { literal, .. } => assert!(literal.contains("note:")),
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_annotation_ignored() {
        let fragment = parse("<!-- slide: ===== -->\n\nx\n");
        // No pairs parsed; root stays clean apart from the consumed comment
        assert_eq!(fragment.root.props.get_attribute("bg"), None);
    }
}
