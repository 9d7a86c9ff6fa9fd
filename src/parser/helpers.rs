//! Helpers shared by the element readers: required attributes, nullable
//! text children and the property-style mappings.

use crate::error::{ProbModelError, Result};
use crate::model::Properties;
use crate::xml::XmlElement;
use indexmap::IndexMap;

/// Value of a required attribute, or a schema error naming element and attribute.
pub fn required_attr(element: &XmlElement, name: &str) -> Result<String> {
    element
        .attribute(name)
        .map(|s| s.to_string())
        .ok_or_else(|| ProbModelError::missing_attribute(&element.name, name))
}

pub fn optional_attr(element: &XmlElement, name: &str) -> Option<String> {
    element.attribute(name).map(|s| s.to_string())
}

/// Trimmed text of the named child. A missing child, a self-closing one and
/// one holding only whitespace all read as `None`.
pub fn child_text(element: &XmlElement, child: &str) -> Option<String> {
    element
        .child(child)
        .and_then(|c| c.text())
        .map(|s| s.to_string())
}

/// Read the `AdditionalProperties` child of `element` (empty when absent).
pub fn additional_properties(element: &XmlElement) -> Result<Properties> {
    match element.child("AdditionalProperties") {
        Some(props) => parse_properties(props),
        None => Ok(Properties::new()),
    }
}

/// Mapping from a property container.
///
/// `<Property name="k" value="v"/>` contributes `k → v` (the value falls back
/// to the element text). Any other child contributes its tag name with its
/// `value` attribute or text.
pub fn parse_properties(container: &XmlElement) -> Result<Properties> {
    let mut properties = Properties::new();
    for child in &container.children {
        let (key, value) = if child.has_tag_name("Property") {
            (required_attr(child, "name")?, property_value(child))
        } else {
            (child.name.clone(), property_value(child))
        };
        properties.insert(key, value);
    }
    Ok(properties)
}

fn property_value(element: &XmlElement) -> String {
    element
        .attribute("value")
        .or_else(|| element.text())
        .unwrap_or("")
        .to_string()
}

/// `Coordinates` carry their data as attributes (`x`, `y`); child elements,
/// if any, are read like properties.
pub fn coordinates(element: &XmlElement) -> Result<Properties> {
    let Some(coords) = element.child("Coordinates") else {
        return Ok(Properties::new());
    };
    let mut out: Properties = coords.attributes.clone();
    for (k, v) in parse_properties(coords)? {
        out.insert(k, v);
    }
    Ok(out)
}

/// `AdditionalConstraints/Constraint name=".."` with `Argument name value`
/// children, as constraint name → arguments.
pub fn additional_constraints(probnet: &XmlElement) -> Result<IndexMap<String, Properties>> {
    let mut out = IndexMap::new();
    let Some(container) = probnet.child("AdditionalConstraints") else {
        return Ok(out);
    };
    for constraint in container.children_named("Constraint") {
        let name = required_attr(constraint, "name")?;
        let mut arguments = Properties::new();
        for arg in constraint.children_named("Argument") {
            arguments.insert(required_attr(arg, "name")?, property_value(arg));
        }
        out.insert(name, arguments);
    }
    Ok(out)
}

/// `DecisionCriteria/Criterion name=".."` as criterion name → its
/// additional properties.
pub fn decision_criteria(probnet: &XmlElement) -> Result<IndexMap<String, Properties>> {
    let mut out = IndexMap::new();
    let Some(container) = probnet.child("DecisionCriteria") else {
        return Ok(out);
    };
    for criterion in container.children_named("Criterion") {
        let name = required_attr(criterion, "name")?;
        out.insert(name, additional_properties(criterion)?);
    }
    Ok(out)
}
