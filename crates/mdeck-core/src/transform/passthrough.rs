//! HTML passthrough directive transformer.

use super::AttributeTransformer;
use crate::element::Properties;

/// Folds `class` and `style` directives into the element's class set and
/// style map. Every other attribute (`data-*`, `id`, ...) already lives in
/// the attribute bag and passes through to the output untouched.
pub struct PassthroughTransformer;

impl AttributeTransformer for PassthroughTransformer {
    fn transform(&self, props: &mut Properties) {
        if let Some(classes) = props.get_attribute("class").map(str::to_string) {
            props.delete_attribute("class");
            for class in classes.split_whitespace() {
                props.add_class(class);
            }
        }

        if let Some(style) = props.get_attribute("style").map(str::to_string) {
            props.delete_attribute("style");
            for declaration in style.split(';') {
                if let Some((property, value)) = declaration.split_once(':') {
                    let property = property.trim();
                    let value = value.trim();
                    if !property.is_empty() && !value.is_empty() {
                        props.add_style(property, value);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_directive_folded() {
        let mut props = Properties::new();
        props.add_attribute("class", "centered red");

        PassthroughTransformer.transform(&mut props);

        assert!(props.has_class("centered"));
        assert!(props.has_class("red"));
        assert_eq!(props.get_attribute("class"), None);
    }

    #[test]
    fn test_style_directive_folded() {
        let mut props = Properties::new();
        props.add_attribute("style", "border: 1px solid; opacity: 0.5");

        PassthroughTransformer.transform(&mut props);

        assert_eq!(props.get_style("border"), Some("1px solid"));
        assert_eq!(props.get_style("opacity"), Some("0.5"));
        assert_eq!(props.get_attribute("style"), None);
    }

    #[test]
    fn test_data_attributes_untouched() {
        let mut props = Properties::new();
        props.add_attribute("data-id", "intro");

        PassthroughTransformer.transform(&mut props);

        assert_eq!(props.get_attribute("data-id"), Some("intro"));
    }

    #[test]
    fn test_malformed_style_declaration_skipped() {
        let mut props = Properties::new();
        props.add_attribute("style", "no-colon-here; color: red");

        PassthroughTransformer.transform(&mut props);

        assert_eq!(props.get_style("color"), Some("red"));
        assert_eq!(props.get_style("no-colon-here"), None);
    }
}
