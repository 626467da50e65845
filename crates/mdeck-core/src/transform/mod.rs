//! The attribute transformer chain.
//!
//! A fixed, ordered list of independent transformers runs once per element
//! over the whole tree (pre-order). Each transformer reads its directive
//! attribute(s) from the shared [`Properties`] bag, derives classes, styles,
//! or data attributes, and deletes the raw directive. A transformer that
//! cannot interpret its directive leaves the element unchanged; nothing in
//! the chain can fail a render.
//!
//! Transformers never depend on another having already run. Where one
//! directive gates another (slide-scoped vs element-scoped targets), the
//! gate is resolved by re-reading the element's current attributes at call
//! time.

mod background;
mod fragment;
mod passthrough;
mod size;
mod text_color;

pub use background::BackgroundTransformer;
pub use fragment::FragmentTransformer;
pub use passthrough::PassthroughTransformer;
pub use size::SizeTransformer;
pub use text_color::ColorTransformer;

use crate::element::{ElementNode, Properties};

/// One stage of the chain: mutate the bag, signal nothing back
pub trait AttributeTransformer: Send + Sync {
    fn transform(&self, props: &mut Properties);
}

/// The chain itself: an explicit configuration list, not discovery
pub struct TransformerChain {
    transformers: Vec<Box<dyn AttributeTransformer>>,
}

impl Default for TransformerChain {
    fn default() -> Self {
        Self {
            transformers: vec![
                Box::new(BackgroundTransformer),
                Box::new(ColorTransformer),
                Box::new(SizeTransformer),
                Box::new(FragmentTransformer),
                Box::new(PassthroughTransformer),
            ],
        }
    }
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the whole chain over every element of the tree.
    pub fn apply(&self, root: &mut ElementNode) {
        root.walk_mut(&mut |node| {
            for transformer in &self.transformers {
                transformer.transform(&mut node.props);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, TARGET_ATTR, TARGET_SLIDE};

    #[test]
    fn test_chain_reaches_nested_elements() {
        let mut root = ElementNode::new(ElementKind::Root);
        let mut para = ElementNode::new(ElementKind::Paragraph);
        let mut image = ElementNode::new(ElementKind::Image {
            url: "x.png".into(),
            title: String::new(),
        });
        image.props.add_attribute("frag", "1");
        para.push(image);
        root.push(para);

        TransformerChain::new().apply(&mut root);

        let image = &root.children[0].children[0];
        assert!(image.props.has_class("fragment"));
        assert_eq!(image.props.get_attribute("frag"), None);
    }

    #[test]
    fn test_chain_consumes_all_directives() {
        let mut root = ElementNode::new(ElementKind::Root);
        root.props.add_attribute("bg", "#336699");
        root.props.add_attribute("class", "centered");
        root.props.add_attribute(TARGET_ATTR, TARGET_SLIDE);

        TransformerChain::new().apply(&mut root);

        assert_eq!(root.props.get_attribute("bg"), None);
        assert_eq!(root.props.get_attribute("class"), None);
        assert!(root.props.has_class("centered"));
        assert_eq!(
            root.props.get_attribute("data-background-color"),
            Some("#336699")
        );
    }
}
