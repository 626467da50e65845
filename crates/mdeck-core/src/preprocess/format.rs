//! Inline formatting shorthand preprocessor.
//!
//! Three per-line rewrites, applied left to right and never overlapping:
//!
//! - `__text__` becomes `**text**` (bold), with surrounding whitespace
//!   trimmed from the captured text
//! - `==text==` becomes `<mark>text</mark>`
//! - `%%text%%` is removed entirely (author-only comment)
//!
//! Running the processor over its own output is a no-op: `**text**` contains
//! none of the source patterns, so nothing double-wraps.

use regex::Regex;

use super::{FenceScanner, TextPreprocessor};

pub struct FormatProcessor {
    bold: Regex,
    mark: Regex,
    comment: Regex,
}

impl FormatProcessor {
    pub fn new() -> Self {
        Self {
            bold: Regex::new(r"__([^_]+)__").unwrap(),
            mark: Regex::new(r"==([^=]*)==").unwrap(),
            comment: Regex::new(r"%%([^%]*)%%").unwrap(),
        }
    }

    fn process_line(&self, line: &str) -> String {
        let line = self.rewrite_bold(line);
        let line = self.mark.replace_all(&line, "<mark>$1</mark>");
        self.comment.replace_all(&line, "").into_owned()
    }

    /// Rewrite `__text__` runs not adjacent to further underscores.
    ///
    /// The adjacency check replaces a lookaround: a match touching another
    /// underscore on either side is part of a longer run and stays literal.
    fn rewrite_bold(&self, line: &str) -> String {
        let bytes = line.as_bytes();
        let mut output = String::with_capacity(line.len());
        let mut cursor = 0;

        for captures in self.bold.captures_iter(line) {
            let whole = captures.get(0).unwrap();
            let before = whole.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(whole.end()).copied();
            if before == Some(b'_') || after == Some(b'_') {
                continue;
            }

            output.push_str(&line[cursor..whole.start()]);
            output.push_str("**");
            output.push_str(captures.get(1).unwrap().as_str().trim());
            output.push_str("**");
            cursor = whole.end();
        }

        output.push_str(&line[cursor..]);
        output
    }
}

impl Default for FormatProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPreprocessor for FormatProcessor {
    fn process(&self, text: &str) -> String {
        let mut scanner = FenceScanner::new();
        let mut output: Vec<String> = Vec::new();

        for line in text.lines() {
            if scanner.observe(line) {
                output.push(line.to_string());
            } else {
                output.push(self.process_line(line));
            }
        }

        let mut result = output.join("\n");
        if text.ends_with('\n') {
            result.push('\n');
        }
        result
    }
}
