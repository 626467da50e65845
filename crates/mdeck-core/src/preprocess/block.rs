//! Container-block preprocessor.
//!
//! `::: name` at the start of a line opens a wrapper `<div>` carrying the
//! name as its class; a line of exactly `:::` closes the innermost open
//! container. Containers nest with stack discipline; containers still open at
//! the end of the document close implicitly.

use super::{FenceScanner, TextPreprocessor};

pub struct BlockProcessor;

impl BlockProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BlockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPreprocessor for BlockProcessor {
    fn process(&self, text: &str) -> String {
        let mut scanner = FenceScanner::new();
        let mut open = 0usize;
        let mut output = Vec::new();

        for line in text.lines() {
            if scanner.observe(line) {
                output.push(line.to_string());
                continue;
            }

            let trimmed = line.trim();
            if trimmed == ":::" {
                if open > 0 {
                    open -= 1;
                    output.push("</div>".to_string());
                } else {
                    // Stray closer with nothing open: leave it alone
                    output.push(line.to_string());
                }
            } else if let Some(name) = trimmed.strip_prefix("::: ") {
                let name = name.trim();
                if name.is_empty() {
                    output.push(line.to_string());
                } else {
                    open += 1;
                    // Trailing blank line keeps the markdown inside the
                    // wrapper parseable as its own blocks
                    output.push(format!("<div class=\"{}\">", name));
                    output.push(String::new());
                }
            } else {
                output.push(line.to_string());
            }
        }

        // Implicit close at end of document
        for _ in 0..open {
            output.push("</div>".to_string());
        }

        let mut result = output.join("\n");
        if text.ends_with('\n') {
            result.push('\n');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(input: &str) -> String {
        BlockProcessor::new().process(input)
    }

    #[test]
    fn test_simple_container() {
        let output = process("::: block\ncontent\n:::\n");
        assert_eq!(output, "<div class=\"block\">\n\ncontent\n</div>\n");
    }

    #[test]
    fn test_named_container_class() {
        let output = process("::: warning\ntext\n:::\n");
        assert!(output.contains("<div class=\"warning\">"));
    }

    #[test]
    fn test_nested_containers_close_lifo() {
        let output = process("::: outer\n::: inner\nx\n:::\ny\n:::\n");
        let first_close = output.find("</div>").unwrap();
        let inner_open = output.find("<div class=\"inner\">").unwrap();
        // Inner opens before the first close; both wrappers close
        assert!(inner_open < first_close);
        assert_eq!(output.matches("</div>").count(), 2);
    }

    #[test]
    fn test_unterminated_container_closes_implicitly() {
        let output = process("::: block\ncontent\n");
        assert!(output.contains("<div class=\"block\">"));
        assert!(output.trim_end().ends_with("</div>"));
    }

    #[test]
    fn test_stray_closer_left_alone() {
        let output = process("no container\n:::\n");
        assert!(output.contains(":::"));
        assert!(!output.contains("</div>"));
    }

    #[test]
    fn test_fenced_markers_are_literal() {
        let output = process("```\n::: block\n:::\n```\n");
        assert!(!output.contains("<div"));
        assert!(output.contains("::: block"));
    }
}
