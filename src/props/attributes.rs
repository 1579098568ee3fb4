//! Attribute conversion - DOM attributes and attribute expressions to props.

use anyhow::Result;

use crate::dom::Attribute;
use crate::scope::Scope;
use crate::template::{AttributeExpression, ExpressionType};
use crate::types::{PropMap, Value};

/// Convert a dashed attribute name to a camel-cased prop key.
///
/// `data-foo-bar` becomes `dataFooBar`.
pub fn dash_to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if upper_next {
        out.push('-');
    }
    out
}

/// Coerce a raw attribute string to a typed value.
///
/// JSON scalar literals (numbers, `true`, `false`, `null`) become typed;
/// anything else, including strings with surrounding whitespace, stays a
/// string.
pub fn coerce_attribute_value(raw: &str) -> Value {
    if raw.is_empty() || raw.trim() != raw {
        return Value::String(raw.to_string());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Convert raw DOM attributes to a props-shaped map.
pub fn dom_attributes_to_object<'a, I>(attributes: I) -> PropMap
where
    I: IntoIterator<Item = &'a Attribute>,
{
    attributes
        .into_iter()
        .map(|attr| (dash_to_camel_case(&attr.name), coerce_attribute_value(&attr.value)))
        .collect()
}

/// Evaluate attribute expressions against `scope`, in order.
///
/// - unnamed attribute (spread): object entries are merged, other values are
///   ignored
/// - ref expression: stored under `ref`
/// - value expression: stored under `value`
/// - anything else: stored under the camel-cased name
pub fn generate_props_from_attributes(
    attributes: &[AttributeExpression],
    scope: Option<&dyn Scope>,
) -> Result<PropMap> {
    let mut props = PropMap::new();
    for expr in attributes {
        let value = expr.evaluate(scope)?;
        match (expr.kind, expr.name.as_deref()) {
            (ExpressionType::Attribute, None) => {
                if let Value::Object(entries) = value {
                    props.extend(entries);
                }
            }
            (ExpressionType::Ref, _) => {
                props.insert("ref".to_string(), value);
            }
            (ExpressionType::Value, _) => {
                props.insert("value".to_string(), value);
            }
            (_, Some(name)) => {
                props.insert(dash_to_camel_case(name), value);
            }
            (_, None) => {}
        }
    }
    Ok(props)
}
