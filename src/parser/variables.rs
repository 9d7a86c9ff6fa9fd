//! `<Variables>` section: variables, their states and thresholds.

use super::helpers::{additional_properties, child_text, coordinates, optional_attr, required_attr};
use crate::error::Result;
use crate::model::*;
use crate::xml::XmlElement;

/// Read every `Variables/Variable` of a `ProbNet` element into `net`.
pub fn parse_variables(probnet: &XmlElement, net: &mut ProbNet) -> Result<()> {
    let Some(container) = probnet.child("Variables") else {
        return Ok(());
    };
    for node in container.children_named("Variable") {
        let variable = parse_variable(node)?;
        log::trace!("variable '{}' with {} states", variable.name, variable.states.len());
        net.add_variable(variable)?;
    }
    Ok(())
}

pub fn parse_variable(node: &XmlElement) -> Result<Variable> {
    let mut variable = Variable::new(
        required_attr(node, "name")?,
        required_attr(node, "type")?,
        required_attr(node, "role")?,
    );
    variable.comment = child_text(node, "Comment");
    variable.coordinates = coordinates(node)?;
    variable.additional_properties = additional_properties(node)?;

    if let Some(states) = node.child("States") {
        for state in states.children_named("State") {
            let name = required_attr(state, "name")?;
            variable.add_state(name, additional_properties(state)?)?;
        }
    }

    if let Some(thresholds) = node.child("Thresholds") {
        variable.thresholds = thresholds
            .children_named("Threshold")
            .map(|t| {
                Ok(Threshold {
                    value: required_attr(t, "value")?,
                    belongs_to: optional_attr(t, "belongsTo"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(variable)
}
