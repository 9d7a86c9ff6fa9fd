//! `<Links>` section.

use super::helpers::{additional_properties, child_text, required_attr};
use crate::error::Result;
use crate::model::*;
use crate::xml::XmlElement;

/// Read every `Links/Link` of a `ProbNet` element into `net`, keyed by
/// `(var1, var2)` as written.
pub fn parse_links(probnet: &XmlElement, net: &mut ProbNet) -> Result<()> {
    let Some(container) = probnet.child("Links") else {
        return Ok(());
    };
    for node in container.children_named("Link") {
        let (key, edge) = parse_link(node)?;
        log::trace!("link {} directed={}", key, edge.directed);
        net.add_edge(key, edge)?;
    }
    Ok(())
}

pub fn parse_link(node: &XmlElement) -> Result<(EdgeKey, Edge)> {
    let key = EdgeKey::new(required_attr(node, "var1")?, required_attr(node, "var2")?);
    let mut edge = Edge::new(required_attr(node, "directed")?);
    edge.comment = child_text(node, "Comment");
    edge.label = child_text(node, "Label");
    edge.additional_properties = additional_properties(node)?;
    Ok((key, edge))
}
