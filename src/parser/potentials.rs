//! `<Potential>` elements.

use super::helpers::{additional_properties, child_text, optional_attr, required_attr};
use crate::error::Result;
use crate::model::*;
use crate::xml::XmlElement;

/// Children of a `Potential` that map onto named fields; everything else
/// is kept as opaque content.
const SCALAR_CHILDREN: &[&str] = &["Comment", "AdditionalProperties"];

/// Append the network's potentials to `net` in document order.
///
/// Potentials are normally direct children of `ProbNet`; the contents of a
/// `Potentials` wrapper are read in place as well.
pub fn parse_potentials(probnet: &XmlElement, net: &mut ProbNet) -> Result<()> {
    for child in &probnet.children {
        match child.name.as_str() {
            "Potential" => net.add_potential(parse_potential(child)?),
            "Potentials" => {
                for node in child.children_named("Potential") {
                    net.add_potential(parse_potential(node)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn parse_potential(node: &XmlElement) -> Result<Potential> {
    let mut potential = Potential::new(required_attr(node, "type")?, required_attr(node, "role")?);
    potential.label = optional_attr(node, "label");
    potential.comment = child_text(node, "Comment");
    potential.additional_properties = additional_properties(node)?;
    potential.text = node.text().map(|t| t.to_string());
    potential.content = node
        .children
        .iter()
        .filter(|c| !SCALAR_CHILDREN.contains(&c.name.as_str()))
        .cloned()
        .collect();
    Ok(potential)
}
