//! CSS hook - Marks a root element with its component name.

use crate::dom::Element;
use crate::props::IS_DIRECTIVE;

/// Mark `element` with the component name so scoped styles can target it.
///
/// Elements whose tag already is the component name need no marker.
pub fn add_css_hook(element: &Element, name: &str) {
    if !element.tag_name().eq_ignore_ascii_case(name) {
        element.set_attribute(IS_DIRECTIVE, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_added_when_tag_differs() {
        let el = Element::new("div");
        add_css_hook(&el, "my-card");
        assert_eq!(el.get_attribute("is").as_deref(), Some("my-card"));
    }

    #[test]
    fn test_no_hook_for_matching_tag() {
        let el = Element::new("MY-CARD");
        add_css_hook(&el, "my-card");
        assert!(!el.has_attribute("is"));
    }
}
