//! Slide segmentation.
//!
//! Splits the preprocessed note body into slides on the horizontal separator
//! line, then each slide into vertically-navigated fragments on the vertical
//! separator line. Separator matching is whole-line (ignoring surrounding
//! whitespace) and fence-aware: a separator inside a fenced code region is
//! literal text, not a slide boundary.

use crate::options::EngineOptions;
use crate::preprocess::FenceScanner;

/// An ordered group of slides produced for one render call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideGroup {
    pub slides: Vec<Slide>,
}

impl SlideGroup {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// One slide: an ordered sequence of vertically-stacked text fragments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    pub fragments: Vec<String>,
}

/// Split a body into slides and fragments.
///
/// A document with zero separators yields exactly one slide with one
/// fragment. Empty trailing fragments (a separator at the end of the
/// document) are dropped.
pub fn segment(body: &str, engine: &EngineOptions) -> SlideGroup {
    let horizontal = engine.separator.trim();
    let vertical = engine.vertical_separator.trim();

    let mut scanner = FenceScanner::new();
    let mut group = SlideGroup::default();
    let mut slide = Slide::default();
    let mut fragment = String::new();

    let mut flush_fragment = |slide: &mut Slide, fragment: &mut String| {
        slide.fragments.push(std::mem::take(fragment));
    };

    for line in body.lines() {
        if !scanner.observe(line) {
            let trimmed = line.trim();
            if trimmed == horizontal {
                flush_fragment(&mut slide, &mut fragment);
                group.slides.push(std::mem::take(&mut slide));
                continue;
            }
            if trimmed == vertical {
                flush_fragment(&mut slide, &mut fragment);
                continue;
            }
        }
        fragment.push_str(line);
        fragment.push('\n');
    }

    flush_fragment(&mut slide, &mut fragment);
    group.slides.push(slide);

    prune(&mut group);
    group
}

/// Drop empty trailing fragments and the slides they empty out, keeping at
/// least one slide with one fragment.
fn prune(group: &mut SlideGroup) {
    for slide in &mut group.slides {
        while slide.fragments.len() > 1 {
            if slide.fragments.last().is_some_and(|f| f.trim().is_empty()) {
                slide.fragments.pop();
            } else {
                break;
            }
        }
    }

    while group.slides.len() > 1 {
        let last_is_empty = group
            .slides
            .last()
            .is_some_and(|s| s.fragments.iter().all(|f| f.trim().is_empty()));
        if last_is_empty {
            group.slides.pop();
        } else {
            break;
        }
    }
}
