//! Foreground color directive transformer.

use super::AttributeTransformer;
use crate::color;
use crate::element::Properties;

/// Handles the `color` directive: a valid color becomes an inline `color`
/// style; anything else is dropped. The raw attribute is always removed.
pub struct ColorTransformer;

impl AttributeTransformer for ColorTransformer {
    fn transform(&self, props: &mut Properties) {
        let Some(value) = props.get_attribute("color").map(str::to_string) else {
            return;
        };

        props.delete_attribute("color");
        if color::parse(&value).is_some() {
            props.add_style("color", value);
        }
    }
}
