//! Build the [`XmlElement`] tree for a [`ProbNet`].
//!
//! Every mapping field gets its container element even when empty, and a
//! `None` comment, language or link label is written as an empty element.

use crate::error::{ProbModelError, Result};
use crate::model::*;
use crate::xml::{XmlElement, is_xml_name};
use indexmap::IndexMap;

/// `<ProbModelXML>` root for a full document.
pub fn document_element(doc: &ProbModelDocument) -> Result<XmlElement> {
    let mut root =
        XmlElement::new("ProbModelXML").with_attribute("formatVersion", doc.format_version.as_str());
    root.push(probnet_element(&doc.probnet)?);
    root.push(
        doc.policies
            .clone()
            .unwrap_or_else(|| XmlElement::new("Policies")),
    );
    root.push(
        doc.inference_options
            .clone()
            .unwrap_or_else(|| XmlElement::new("InferenceOptions")),
    );
    Ok(root)
}

pub fn probnet_element(net: &ProbNet) -> Result<XmlElement> {
    let mut node = XmlElement::new("ProbNet").with_attribute("type", net.net_type.as_str());
    node.push(constraints_element(&net.additional_constraints));
    node.push(text_element("Comment", net.comment.as_deref()));
    node.push(text_element("Language", net.language.as_deref()));
    node.push(properties_element("AdditionalProperties", &net.additional_properties));
    if !net.decision_criteria.is_empty() {
        node.push(criteria_element(&net.decision_criteria));
    }

    let mut variables = XmlElement::new("Variables");
    for variable in net.variables.values() {
        variables.push(variable_element(variable)?);
    }
    node.push(variables);

    let mut links = XmlElement::new("Links");
    for (key, edge) in &net.edges {
        links.push(link_element(key, edge)?);
    }
    node.push(links);

    for potential in &net.potentials {
        node.push(potential_element(potential));
    }
    Ok(node)
}

fn variable_element(variable: &Variable) -> Result<XmlElement> {
    if variable.name.is_empty() {
        return Err(ProbModelError::missing_attribute("Variable", "name"));
    }
    let mut node = XmlElement::new("Variable")
        .with_attribute("name", variable.name.as_str())
        .with_attribute("type", variable.var_type.as_str())
        .with_attribute("role", variable.role.as_str());
    node.push(text_element("Comment", variable.comment.as_deref()));

    node.push(coordinates_element(&variable.coordinates));
    node.push(properties_element("AdditionalProperties", &variable.additional_properties));

    let mut states = XmlElement::new("States");
    for (state, props) in &variable.states {
        if state.is_empty() {
            return Err(ProbModelError::missing_attribute("State", "name"));
        }
        states.push(
            XmlElement::new("State")
                .with_attribute("name", state.as_str())
                .with_child(properties_element("AdditionalProperties", props)),
        );
    }
    node.push(states);

    if !variable.thresholds.is_empty() {
        let mut thresholds = XmlElement::new("Thresholds");
        for t in &variable.thresholds {
            let mut threshold = XmlElement::new("Threshold").with_attribute("value", t.value.as_str());
            if let Some(belongs_to) = &t.belongs_to {
                threshold = threshold.with_attribute("belongsTo", belongs_to.as_str());
            }
            thresholds.push(threshold);
        }
        node.push(thresholds);
    }
    Ok(node)
}

fn link_element(key: &EdgeKey, edge: &Edge) -> Result<XmlElement> {
    if key.from.is_empty() {
        return Err(ProbModelError::missing_attribute("Link", "var1"));
    }
    if key.to.is_empty() {
        return Err(ProbModelError::missing_attribute("Link", "var2"));
    }
    Ok(XmlElement::new("Link")
        .with_attribute("var1", key.from.as_str())
        .with_attribute("var2", key.to.as_str())
        .with_attribute("directed", edge.directed.as_str())
        .with_child(text_element("Comment", edge.comment.as_deref()))
        .with_child(text_element("Label", edge.label.as_deref()))
        .with_child(properties_element("AdditionalProperties", &edge.additional_properties)))
}

fn potential_element(potential: &Potential) -> XmlElement {
    let mut node = XmlElement::new("Potential")
        .with_attribute("type", potential.pot_type.as_str())
        .with_attribute("role", potential.role.as_str());
    if let Some(label) = &potential.label {
        node = node.with_attribute("label", label.as_str());
    }
    node.push(text_element("Comment", potential.comment.as_deref()));
    node.push(properties_element("AdditionalProperties", &potential.additional_properties));
    node.children.extend(potential.content.iter().cloned());
    node.text = potential.text.clone();
    node
}

/// Coordinates go out as attributes (`x="10"`) when the key is a usable
/// attribute name, otherwise as `Property` children.
fn coordinates_element(coordinates: &Properties) -> XmlElement {
    let mut node = XmlElement::new("Coordinates");
    for (k, v) in coordinates {
        if is_xml_name(k) {
            node.attributes.insert(k.clone(), v.clone());
        } else {
            node.push(property_element(k, v));
        }
    }
    node
}

fn text_element(name: &str, text: Option<&str>) -> XmlElement {
    XmlElement::new(name).with_text(text)
}

fn properties_element(name: &str, properties: &Properties) -> XmlElement {
    let mut node = XmlElement::new(name);
    for (k, v) in properties {
        node.push(property_element(k, v));
    }
    node
}

fn property_element(name: &str, value: &str) -> XmlElement {
    XmlElement::new("Property")
        .with_attribute("name", name)
        .with_attribute("value", value)
}

fn constraints_element(constraints: &IndexMap<String, Properties>) -> XmlElement {
    let mut node = XmlElement::new("AdditionalConstraints");
    for (name, arguments) in constraints {
        let mut constraint = XmlElement::new("Constraint").with_attribute("name", name.as_str());
        for (k, v) in arguments {
            constraint.push(
                XmlElement::new("Argument")
                    .with_attribute("name", k.as_str())
                    .with_attribute("value", v.as_str()),
            );
        }
        node.push(constraint);
    }
    node
}

fn criteria_element(criteria: &IndexMap<String, Properties>) -> XmlElement {
    let mut node = XmlElement::new("DecisionCriteria");
    for (name, props) in criteria {
        node.push(
            XmlElement::new("Criterion")
                .with_attribute("name", name.as_str())
                .with_child(properties_element("AdditionalProperties", props)),
        );
    }
    node
}
