//! Generic XML element tree and the pluggable XML backend.
//!
//! The reader and writer never touch an XML library directly. They walk and
//! build [`XmlElement`] trees and delegate text conversion to an
//! [`XmlBackend`], chosen once when the reader or writer is constructed.
//! [`DefaultBackend`] parses with `roxmltree` and serializes with `quick-xml`.

use crate::error::{ProbModelError, Result};
use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One element of a parsed or to-be-written XML document.
///
/// `text` holds the element's own character data (direct text children
/// concatenated and trimmed); whitespace-only content is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<XmlElement>,
    #[serde(default)]
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the text content. Empty or whitespace-only text is stored as `None`.
    pub fn with_text(mut self, text: Option<&str>) -> Self {
        self.text = normalize_text(text);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_tag_name(&self, name: &str) -> bool {
        self.name == name
    }

    /// First child element with the given tag.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.has_tag_name(name))
    }

    /// All child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.has_tag_name(name))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

pub(crate) fn normalize_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// The two capabilities the reader and writer need from an XML library.
pub trait XmlBackend {
    /// Parse XML text into its root element.
    fn parse(&self, text: &str) -> Result<XmlElement>;
    /// Serialize a tree rooted at `root` into XML text.
    ///
    /// `indent` is the number of spaces per nesting level (0 disables
    /// pretty-printing); `declaration` controls the leading `<?xml …?>`.
    fn serialize(&self, root: &XmlElement, indent: usize, declaration: bool) -> Result<String>;
}

/// `roxmltree` for parsing, `quick-xml` for serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBackend;

impl XmlBackend for DefaultBackend {
    fn parse(&self, text: &str) -> Result<XmlElement> {
        let doc = Document::parse(text).map_err(|e| ProbModelError::Parse {
            message: e.to_string(),
        })?;
        Ok(convert_node(doc.root_element()))
    }

    fn serialize(&self, root: &XmlElement, indent: usize, declaration: bool) -> Result<String> {
        let mut writer = if indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        } else {
            Writer::new(Vec::new())
        };
        if declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(serialize_error)?;
        }
        write_element(&mut writer, root)?;
        let mut bytes = writer.into_inner();
        if indent > 0 {
            bytes.push(b'\n');
        }
        String::from_utf8(bytes).map_err(serialize_error)
    }
}

fn convert_node(node: Node) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());
    for attr in node.attributes() {
        element
            .attributes
            .insert(attr.name().to_string(), attr.value().to_string());
    }
    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            element.children.push(convert_node(child));
        } else if child.is_text() {
            if let Some(t) = child.text() {
                text.push_str(t);
            }
        }
    }
    element.text = normalize_text(Some(&text));
    element
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    if !is_xml_name(&element.name) {
        return Err(ProbModelError::Serialize {
            message: format!("'{}' is not a valid element name", element.name),
        });
    }
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        if !is_xml_name(name) {
            return Err(ProbModelError::Serialize {
                message: format!("'{}' is not a valid attribute name on <{}>", name, element.name),
            });
        }
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(xml_escape_attr(value).into_bytes()),
        });
    }
    if element.children.is_empty() && element.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialize_error);
    }
    writer
        .write_event(Event::Start(start))
        .map_err(serialize_error)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::from_escaped(xml_escape(text))))
            .map_err(serialize_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(serialize_error)
}

/// Escape character data. Carriage returns are written as references since
/// parsers fold a literal `\r` into `\n`.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value. Like [`xml_escape`] but also encodes quotes,
/// newlines and tabs, which attribute-value normalization turns into spaces.
fn xml_escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whether `name` can be written as an unprefixed element or attribute name.
///
/// Colons are refused (no namespace support), as is anything starting with
/// `xml`, which is reserved and would read back as a declaration.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if name
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"))
    {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn serialize_error(e: impl std::fmt::Display) -> ProbModelError {
    ProbModelError::Serialize {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collects_attributes_children_and_trimmed_text() {
        let root = DefaultBackend
            .parse(r#"<A x="1" y="2"><B>  hello </B><C/>  </A>"#)
            .unwrap();
        assert_eq!(root.name, "A");
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.attribute("y"), Some("2"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("B").and_then(|b| b.text()), Some("hello"));
        assert_eq!(root.child("C").and_then(|c| c.text()), None);
        assert_eq!(root.text(), None);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = DefaultBackend.parse("<A><B></A>").unwrap_err();
        assert!(matches!(err, ProbModelError::Parse { .. }));
    }

    #[test]
    fn whitespace_in_attributes_and_carriage_returns_in_text_survive() {
        let root = XmlElement::new("A")
            .with_attribute("label", "a\nb\tc\rd")
            .with_child(XmlElement::new("T").with_text(Some("line1\r\nline2")));
        let text = DefaultBackend.serialize(&root, 2, false).unwrap();
        assert!(text.contains("label=\"a&#xA;b&#x9;c&#xD;d\""));
        let back = DefaultBackend.parse(&text).unwrap();
        assert_eq!(back.attribute("label"), Some("a\nb\tc\rd"));
        assert_eq!(back.child("T").and_then(|t| t.text()), Some("line1\r\nline2"));
    }

    #[test]
    fn invalid_names_are_refused_on_output() {
        let bad_attr = XmlElement::new("Coordinates").with_attribute("pos x", "1");
        let err = DefaultBackend.serialize(&bad_attr, 0, false).unwrap_err();
        assert!(matches!(err, ProbModelError::Serialize { .. }));
        let bad_tag = XmlElement::new("1st");
        assert!(DefaultBackend.serialize(&bad_tag, 0, false).is_err());
    }

    #[test]
    fn xml_names() {
        for ok in ["x", "_y", "pos-x", "a.b", "été", "Xy1"] {
            assert!(is_xml_name(ok), "{}", ok);
        }
        for bad in ["", "pos x", "1x", "-x", "ns:x", "xmlns", "XMLfoo", "a&b"] {
            assert!(!is_xml_name(bad), "{}", bad);
        }
    }

    #[test]
    fn serialize_escapes_and_self_closes_empty_elements() {
        let root = XmlElement::new("A")
            .with_attribute("label", "a<b & \"c\"")
            .with_child(XmlElement::new("Empty"))
            .with_child(XmlElement::new("T").with_text(Some("x < y")));
        let text = DefaultBackend.serialize(&root, 2, true).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<Empty/>"));
        assert!(text.contains("<T>x &lt; y</T>"));
        let back = DefaultBackend.parse(&text).unwrap();
        assert_eq!(back, root);
    }
}
