//! ProbModelXML reader.
//!
//! Provides [`ProbModelXmlReader`] to turn ProbModelXML text into a
//! [`ProbNet`]. Sub-modules split the walk into focused areas:
//!
//! - [`helpers`] – required attributes, nullable text, property mappings
//! - [`variables`] – `Variables/Variable` with states and thresholds
//! - [`links`] – `Links/Link`
//! - [`potentials`] – network-level `Potential` elements

pub mod helpers;
pub mod links;
pub mod potentials;
pub mod variables;

use crate::error::{ProbModelError, Result};
use crate::model::*;
use crate::xml::{DefaultBackend, XmlBackend, XmlElement};
use std::io::Read;

const ROOT_TAG: &str = "ProbModelXML";

/// ProbModelXML reader. Generic over [`XmlBackend`] so the XML library is
/// chosen once, at construction.
///
/// The reader holds no per-document state; one instance can parse any
/// number of documents, from any number of threads if the backend is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct ProbModelXmlReader<B: XmlBackend = DefaultBackend> {
    backend: B,
}

impl ProbModelXmlReader<DefaultBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: XmlBackend> ProbModelXmlReader<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse ProbModelXML text into its network.
    pub fn parse_str(&self, text: &str) -> Result<ProbNet> {
        Ok(self.parse_document_str(text)?.probnet)
    }

    /// Read a whole input handle and parse it. The handle is consumed and
    /// released before this returns, on success and on failure.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ProbNet> {
        Ok(self.parse_document_reader(reader)?.probnet)
    }

    /// Parse text into the full document, including the root attributes and
    /// the `Policies`/`InferenceOptions` siblings.
    pub fn parse_document_str(&self, text: &str) -> Result<ProbModelDocument> {
        let root = self.backend.parse(text)?;
        parse_document_element(&root)
    }

    pub fn parse_document_reader<R: Read>(&self, mut reader: R) -> Result<ProbModelDocument> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        drop(reader);
        let text = String::from_utf8(bytes).map_err(|e| ProbModelError::Parse {
            message: format!("input is not valid UTF-8: {}", e),
        })?;
        self.parse_document_str(&text)
    }
}

/// Walk an already-parsed `<ProbModelXML>` tree.
pub fn parse_document_element(root: &XmlElement) -> Result<ProbModelDocument> {
    if !root.has_tag_name(ROOT_TAG) {
        return Err(ProbModelError::Schema {
            element: root.name.clone(),
            missing: format!("expected <{}> as the document root", ROOT_TAG),
        });
    }
    let probnet_node = root
        .child("ProbNet")
        .ok_or_else(|| ProbModelError::missing_element(ROOT_TAG, "ProbNet"))?;
    let probnet = parse_probnet_element(probnet_node)?;

    Ok(ProbModelDocument {
        format_version: root
            .attribute("formatVersion")
            .unwrap_or("1.0")
            .to_string(),
        probnet,
        policies: root.child("Policies").cloned(),
        inference_options: root.child("InferenceOptions").cloned(),
    })
}

/// Walk a `<ProbNet>` element.
pub fn parse_probnet_element(node: &XmlElement) -> Result<ProbNet> {
    let mut net = ProbNet::new(helpers::required_attr(node, "type")?);
    net.comment = helpers::child_text(node, "Comment");
    net.language = helpers::child_text(node, "Language");
    net.additional_constraints = helpers::additional_constraints(node)?;
    net.additional_properties = helpers::additional_properties(node)?;
    net.decision_criteria = helpers::decision_criteria(node)?;
    variables::parse_variables(node, &mut net)?;
    links::parse_links(node, &mut net)?;
    potentials::parse_potentials(node, &mut net)?;

    for name in net.unresolved_endpoints() {
        log::debug!("link endpoint '{}' names no declared variable", name);
    }
    log::debug!(
        "parsed {} network: {} variables, {} links, {} potentials",
        net.net_type,
        net.variables.len(),
        net.edges.len(),
        net.potentials.len()
    );
    Ok(net)
}

/// Parse ProbModelXML text with the default backend.
pub fn parse_probmodelxml(text: &str) -> Result<ProbNet> {
    ProbModelXmlReader::new().parse_str(text)
}

/// Parse ProbModelXML from an input handle with the default backend.
pub fn read_probmodelxml<R: Read>(reader: R) -> Result<ProbNet> {
    ProbModelXmlReader::new().parse_reader(reader)
}
