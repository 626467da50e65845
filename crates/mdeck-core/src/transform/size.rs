//! Element sizing directive transformer.

use super::AttributeTransformer;
use crate::element::Properties;

/// Handles the `w` and `h` directives, turning them into `width` and
/// `height` inline styles. Bare numbers get a `px` suffix; any other value
/// is taken as a CSS length verbatim.
pub struct SizeTransformer;

impl SizeTransformer {
    fn css_length(value: &str) -> String {
        let value = value.trim();
        if value.chars().all(|c| c.is_ascii_digit()) && !value.is_empty() {
            format!("{}px", value)
        } else {
            value.to_string()
        }
    }
}

impl AttributeTransformer for SizeTransformer {
    fn transform(&self, props: &mut Properties) {
        if let Some(width) = props.get_attribute("w").map(str::to_string) {
            props.delete_attribute("w");
            if !width.trim().is_empty() {
                props.add_style("width", Self::css_length(&width));
            }
        }

        if let Some(height) = props.get_attribute("h").map(str::to_string) {
            props.delete_attribute("h");
            if !height.trim().is_empty() {
                props.add_style("height", Self::css_length(&height));
            }
        }
    }
}
