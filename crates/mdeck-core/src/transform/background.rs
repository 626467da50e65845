//! Background directive transformer.

use super::AttributeTransformer;
use crate::color;
use crate::element::Properties;

/// Handles the `bg` directive.
///
/// The value is a color or an image reference; the two cases are told apart
/// by color-parse success alone. A string that fails to parse as a color is
/// an image reference, even when it was meant to be a color and is merely
/// malformed.
pub struct BackgroundTransformer;

impl AttributeTransformer for BackgroundTransformer {
    fn transform(&self, props: &mut Properties) {
        let Some(bg) = props.get_attribute("bg").map(str::to_string) else {
            return;
        };

        match color::parse(&bg) {
            Some(parsed) => {
                if parsed.is_light() {
                    props.add_class("has-light-background");
                    props.delete_class("has-dark-background");
                } else {
                    props.add_class("has-dark-background");
                    props.delete_class("has-light-background");
                }

                props.delete_attribute("bg");
                if props.targets_slide() {
                    props.add_attribute("data-background-color", bg);
                } else {
                    props.add_style("background-color", bg);
                }
            }
            None => {
                props.delete_attribute("bg");
                if props.targets_slide() {
                    props.add_attribute("data-background-image", bg);
                }
                // Element-scoped image backgrounds are silently dropped
            }
        }
    }
}
