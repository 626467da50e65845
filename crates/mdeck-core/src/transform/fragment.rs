//! Animation fragment directive transformer.

use super::AttributeTransformer;
use crate::element::Properties;

/// Handles the `frag` directive: the element becomes a presentation
/// fragment (revealed step by step). A numeric value also fixes the reveal
/// order via `data-fragment-index`.
pub struct FragmentTransformer;

impl AttributeTransformer for FragmentTransformer {
    fn transform(&self, props: &mut Properties) {
        let Some(value) = props.get_attribute("frag").map(str::to_string) else {
            return;
        };

        props.delete_attribute("frag");
        props.add_class("fragment");
        if value.trim().parse::<u32>().is_ok() {
            props.add_attribute("data-fragment-index", value.trim());
        }
    }
}
