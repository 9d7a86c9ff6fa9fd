use anyhow::Result;
use probmodelxml::{
    ProbModelXmlReader, ProbModelXmlWriter, WriterOptions, generate_probmodelxml, parse_probmodelxml,
};

const STUDENT: &str = include_str!("data/student.pgmx");

const INFLUENCE_DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ProbModelXML formatVersion="0.2.0">
  <ProbNet type="InfluenceDiagram">
    <AdditionalConstraints>
      <Constraint name="MaxNumParents">
        <Argument name="numParents" value="3"/>
      </Constraint>
    </AdditionalConstraints>
    <Comment><![CDATA[Oil wildcatter & friends]]></Comment>
    <DecisionCriteria>
      <Criterion name="cost">
        <AdditionalProperties><Property name="unit" value="EUR"/></AdditionalProperties>
      </Criterion>
    </DecisionCriteria>
    <AdditionalProperties>
      <Property name="KindOfGraph" value="mixed"/>
      <Property name="Title" value="&lt;oil&gt;"/>
    </AdditionalProperties>
    <Variables>
      <Variable name="Test" type="FiniteState" role="Decision">
        <Coordinates x="120" y="80"/>
        <AdditionalProperties><Property name="Relevance" value="7.0"/></AdditionalProperties>
        <States>
          <State name="yes"><AdditionalProperties><Property name="cost" value="10"/></AdditionalProperties></State>
          <State name="no"/>
        </States>
      </Variable>
      <Variable name="Depth" type="Continuous" role="Chance">
        <Comment>metres</Comment>
        <Thresholds>
          <Threshold value="-Infinity" belongsTo="right"/>
          <Threshold value="1000"/>
          <Threshold value="Infinity" belongsTo="left"/>
        </Thresholds>
      </Variable>
    </Variables>
    <Links>
      <Link var1="Test" var2="Depth" directed="0"/>
    </Links>
    <Potentials>
      <Potential type="Table" role="ConditionalProbability">
        <Variables>
          <Variable name="Depth"/>
          <Variable name="Test"/>
        </Variables>
        <Values>0.3 0.7 0.5 0.5</Values>
      </Potential>
    </Potentials>
    <Potential type="Table" role="Utility" label="u1">
      <UtilityVariable name="U"/>
      <Values>-10 20</Values>
    </Potential>
  </ProbNet>
  <Policies>
    <Policy type="deterministic"/>
  </Policies>
</ProbModelXML>
"#;

#[test]
fn read_write_read_is_stable_for_student_network() -> Result<()> {
    let first = parse_probmodelxml(STUDENT)?;
    let text = generate_probmodelxml(&first)?;
    let second = parse_probmodelxml(&text)?;
    assert_eq!(first, second);
    // A second pass produces identical text.
    assert_eq!(generate_probmodelxml(&second)?, text);
    Ok(())
}

#[test]
fn read_write_read_is_stable_for_extended_dialect() -> Result<()> {
    let first = parse_probmodelxml(INFLUENCE_DIAGRAM)?;
    let second = parse_probmodelxml(&generate_probmodelxml(&first)?)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn extended_dialect_fields() -> Result<()> {
    let net = parse_probmodelxml(INFLUENCE_DIAGRAM)?;
    assert_eq!(net.comment.as_deref(), Some("Oil wildcatter & friends"));
    assert_eq!(net.language, None);
    assert_eq!(net.additional_constraints["MaxNumParents"]["numParents"], "3");
    assert_eq!(net.decision_criteria["cost"]["unit"], "EUR");
    assert_eq!(net.additional_properties["Title"], "<oil>");

    let test = &net.variables["Test"];
    assert_eq!(test.role, "Decision");
    assert_eq!(test.coordinates["x"], "120");
    assert_eq!(test.coordinates["y"], "80");
    assert_eq!(test.additional_properties["Relevance"], "7.0");
    assert_eq!(test.states["yes"]["cost"], "10");
    assert!(test.states["no"].is_empty());

    let depth = &net.variables["Depth"];
    assert!(depth.states.is_empty());
    assert!(depth.coordinates.is_empty());
    assert_eq!(depth.thresholds.len(), 3);
    assert_eq!(depth.thresholds[1].value, "1000");
    assert_eq!(depth.thresholds[1].belongs_to, None);
    assert_eq!(depth.thresholds[2].belongs_to.as_deref(), Some("left"));

    let link = net.edge("Test", "Depth").expect("link");
    assert_eq!(link.directed, "0");
    assert!(!link.is_directed());
    assert_eq!(link.label, None);
    assert_eq!(link.comment, None);

    assert_eq!(net.potentials.len(), 2);
    let cpt = &net.potentials[0];
    assert_eq!(cpt.label, None);
    let names: Vec<&str> = cpt.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Variables", "Values"]);
    assert_eq!(cpt.content[1].text(), Some("0.3 0.7 0.5 0.5"));
    assert_eq!(net.potentials[1].label.as_deref(), Some("u1"));
    assert_eq!(net.potentials[1].content[0].attribute("name"), Some("U"));
    Ok(())
}

#[test]
fn document_siblings_survive_a_round_trip() -> Result<()> {
    let reader = ProbModelXmlReader::new();
    let doc = reader.parse_document_str(INFLUENCE_DIAGRAM)?;
    assert_eq!(doc.format_version, "0.2.0");
    assert!(doc.inference_options.is_none());

    let text = ProbModelXmlWriter::new().document_to_string(&doc)?;
    assert!(text.contains("<Policy type=\"deterministic\"/>"));
    assert!(text.contains("<InferenceOptions/>"));
    let again = reader.parse_document_str(&text)?;
    assert_eq!(again.probnet, doc.probnet);
    assert_eq!(again.policies, doc.policies);
    Ok(())
}

#[test]
fn potentials_are_written_as_probnet_children() -> Result<()> {
    let net = parse_probmodelxml(INFLUENCE_DIAGRAM)?;
    let root = ProbModelXmlWriter::new().to_element(&net)?;
    let probnet = root.child("ProbNet").expect("ProbNet");
    assert!(probnet.child("Potentials").is_none());
    assert_eq!(probnet.children_named("Potential").count(), 2);
    Ok(())
}

#[test]
fn writer_streams_to_any_sink() -> Result<()> {
    let net = parse_probmodelxml(STUDENT)?;
    let writer = ProbModelXmlWriter::new().options(WriterOptions {
        indent: 4,
        ..Default::default()
    });
    let mut out: Vec<u8> = Vec::new();
    writer.write_to(&net, &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("\n    <ProbNet type=\"BayesianNetwork\">"));
    assert_eq!(parse_probmodelxml(&text)?, net);
    Ok(())
}

const AWKWARD_VALUES: &str = r#"<ProbModelXML formatVersion="1.0">
  <ProbNet type="BayesianNetwork">
    <AdditionalProperties>
      <Property name="two words" value="line1&#10;line2"/>
    </AdditionalProperties>
    <Variables>
      <Variable name="in&#9;tab" type="FiniteState" role="Chance">
        <Coordinates x="1">
          <Property name="pos x" value="3"/>
          <Property name="xmlns" value="4"/>
        </Coordinates>
        <States><State name="a&#13;b"/></States>
      </Variable>
      <Variable name="other" type="FiniteState" role="Chance"/>
    </Variables>
    <Links>
      <Link var1="in&#9;tab" var2="other" directed="1"><Label>l</Label></Link>
    </Links>
    <Potential type="Table" role="Utility" label="a&#10;b">
      <AdditionalProperties><Property name="format" value="dense"/></AdditionalProperties>
      <Variables><Variable name="in&#9;tab"/></Variables>
      <Values>1 2</Values>
    </Potential>
    <Potential type="Table" role="ConditionalProbability">0.2 0.8<Variables><Variable name="other"/></Variables></Potential>
  </ProbNet>
</ProbModelXML>
"#;

#[test]
fn character_references_in_attributes_survive_a_round_trip() -> Result<()> {
    let first = parse_probmodelxml(AWKWARD_VALUES)?;
    assert_eq!(first.additional_properties["two words"], "line1\nline2");
    assert!(first.variables.contains_key("in\ttab"));
    assert!(first.variables["in\ttab"].states.contains_key("a\rb"));
    assert!(first.edge("in\ttab", "other").is_some());
    assert_eq!(first.potentials[0].label.as_deref(), Some("a\nb"));

    let text = generate_probmodelxml(&first)?;
    let second = parse_probmodelxml(&text)?;
    assert_eq!(first, second);
    assert_eq!(second.potentials[0].label.as_deref(), Some("a\nb"));
    Ok(())
}

#[test]
fn coordinate_keys_that_are_not_xml_names_are_written_as_properties() -> Result<()> {
    let first = parse_probmodelxml(AWKWARD_VALUES)?;
    let coords = &first.variables["in\ttab"].coordinates;
    assert_eq!(coords["x"], "1");
    assert_eq!(coords["pos x"], "3");
    assert_eq!(coords["xmlns"], "4");

    let text = generate_probmodelxml(&first)?;
    assert!(text.contains("<Coordinates x=\"1\">"));
    assert!(text.contains("<Property name=\"pos x\" value=\"3\"/>"));
    assert!(text.contains("<Property name=\"xmlns\" value=\"4\"/>"));
    let second = parse_probmodelxml(&text)?;
    assert_eq!(second.variables["in\ttab"].coordinates, *coords);
    Ok(())
}

#[test]
fn potential_properties_content_and_text_survive_a_round_trip() -> Result<()> {
    let first = parse_probmodelxml(AWKWARD_VALUES)?;
    let utility = &first.potentials[0];
    assert_eq!(utility.additional_properties["format"], "dense");
    let names: Vec<&str> = utility.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Variables", "Values"]);
    assert_eq!(utility.text, None);
    let cpt = &first.potentials[1];
    assert_eq!(cpt.text.as_deref(), Some("0.2 0.8"));
    assert_eq!(cpt.comment, None);

    let second = parse_probmodelxml(&generate_probmodelxml(&first)?)?;
    assert_eq!(second.potentials, first.potentials);
    assert_eq!(second.potentials[0].additional_properties["format"], "dense");
    assert_eq!(second.potentials[1].text.as_deref(), Some("0.2 0.8"));
    Ok(())
}
