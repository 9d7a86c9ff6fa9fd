//! ProbModelXML reader and writer.
//!
//! This crate parses ProbModelXML documents (probabilistic graphical models:
//! variables with discrete states, links between them and potentials) into
//! the strongly-typed [`model::ProbNet`], and writes a `ProbNet` back out.
//!
//! ```
//! let xml = r#"<ProbModelXML formatVersion="1.0">
//!   <ProbNet type="BayesianNetwork">
//!     <Variables>
//!       <Variable name="rain" type="FiniteState" role="Chance">
//!         <States><State name="yes"/><State name="no"/></States>
//!       </Variable>
//!     </Variables>
//!   </ProbNet>
//! </ProbModelXML>"#;
//! let net = probmodelxml::parse_probmodelxml(xml).unwrap();
//! assert_eq!(net.variables["rain"].states.len(), 2);
//! let text = probmodelxml::generate_probmodelxml(&net).unwrap();
//! assert_eq!(probmodelxml::parse_probmodelxml(&text).unwrap(), net);
//! ```

pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod xml;

pub use error::{KeyKind, ProbModelError, Result};
pub use generator::{ProbModelXmlWriter, WriterOptions, generate_probmodelxml};
pub use model::*;
pub use parser::{ProbModelXmlReader, parse_probmodelxml, read_probmodelxml};
pub use xml::{DefaultBackend, XmlBackend, XmlElement};
