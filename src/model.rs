use crate::error::{KeyKind, ProbModelError, Result};
use crate::xml::XmlElement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// String-keyed extension data (`AdditionalProperties`, `Coordinates`,
/// constraint arguments, state properties).
pub type Properties = IndexMap<String, String>;

// ────────────────────────────────────────────────────────────────────────────
// ProbModelDocument
// ────────────────────────────────────────────────────────────────────────────

/// A whole `<ProbModelXML>` document: the network plus the root-level
/// siblings this crate carries without interpreting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbModelDocument {
    pub format_version: String,
    pub probnet: ProbNet,
    #[serde(default)]
    pub policies: Option<XmlElement>,
    #[serde(default)]
    pub inference_options: Option<XmlElement>,
}

impl ProbModelDocument {
    pub fn new(probnet: ProbNet) -> Self {
        Self {
            format_version: "1.0".to_string(),
            probnet,
            policies: None,
            inference_options: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ProbNet
// ────────────────────────────────────────────────────────────────────────────

/// One probabilistic network.
///
/// Mapping fields are always present, possibly empty. Only the scalar
/// `comment` and `language` may be `None`; an absent element and an empty
/// one both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbNet {
    /// Network class, e.g. `"BayesianNetwork"`.
    #[serde(rename = "type")]
    pub net_type: String,
    pub comment: Option<String>,
    pub language: Option<String>,
    /// Constraint name → its `Argument` name/value pairs.
    #[serde(default)]
    pub additional_constraints: IndexMap<String, Properties>,
    #[serde(default)]
    pub additional_properties: Properties,
    /// Criterion name → its additional properties.
    #[serde(default)]
    pub decision_criteria: IndexMap<String, Properties>,
    /// Keyed by `Variable::name`.
    #[serde(default, deserialize_with = "variable_map::deserialize")]
    pub variables: IndexMap<String, Variable>,
    /// Links in document order, keyed by `(var1, var2)` exactly as authored.
    /// Endpoints are not checked against `variables`.
    #[serde(default, with = "edge_list")]
    pub edges: IndexMap<EdgeKey, Edge>,
    #[serde(default)]
    pub potentials: Vec<Potential>,
}

impl ProbNet {
    pub fn new(net_type: impl Into<String>) -> Self {
        Self {
            net_type: net_type.into(),
            ..Default::default()
        }
    }

    /// Insert a variable, rejecting a name that is already taken.
    pub fn add_variable(&mut self, variable: Variable) -> Result<()> {
        if self.variables.contains_key(&variable.name) {
            return Err(ProbModelError::DuplicateKey {
                kind: KeyKind::Variable,
                key: variable.name,
            });
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Insert a link, rejecting a `(var1, var2)` pair that is already present.
    /// `(a, b)` and `(b, a)` are distinct keys.
    pub fn add_edge(&mut self, key: EdgeKey, edge: Edge) -> Result<()> {
        if self.edges.contains_key(&key) {
            return Err(ProbModelError::DuplicateKey {
                kind: KeyKind::Link,
                key: key.to_string(),
            });
        }
        self.edges.insert(key, edge);
        Ok(())
    }

    pub fn add_potential(&mut self, potential: Potential) {
        self.potentials.push(potential);
    }

    pub fn edge(&self, var1: &str, var2: &str) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(var1, var2))
    }

    /// Link endpoints that name no variable of this network.
    pub fn unresolved_endpoints(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for key in self.edges.keys() {
            for name in [key.from.as_str(), key.to.as_str()] {
                if !self.variables.contains_key(name) && !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Variable
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// e.g. `"FiniteState"`, `"Continuous"`.
    #[serde(rename = "type")]
    pub var_type: String,
    /// e.g. `"Chance"`, `"Decision"`, `"Utility"`.
    pub role: String,
    pub comment: Option<String>,
    #[serde(default)]
    pub coordinates: Properties,
    #[serde(default)]
    pub additional_properties: Properties,
    /// State name → the state's additional properties (commonly empty).
    #[serde(default)]
    pub states: IndexMap<String, Properties>,
    /// Interval bounds of a continuous variable, in document order.
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        var_type: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            var_type: var_type.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Insert a state, rejecting a name already used by this variable.
    pub fn add_state(&mut self, name: impl Into<String>, properties: Properties) -> Result<()> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(ProbModelError::DuplicateKey {
                kind: KeyKind::State,
                key: format!("{}.{}", self.name, name),
            });
        }
        self.states.insert(name, properties);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: String,
    pub belongs_to: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Edge
// ────────────────────────────────────────────────────────────────────────────

/// Ordered `(from, to)` pair identifying a link. Never sorted or normalized:
/// `EdgeKey::new("a", "b") != EdgeKey::new("b", "a")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: String,
    pub to: String,
}

impl EdgeKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for EdgeKey {
    fn from((from, to): (A, B)) -> Self {
        Self::new(from, to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Literal `directed` attribute (`"0"` / `"1"`), kept verbatim.
    pub directed: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub additional_properties: Properties,
}

impl Edge {
    pub fn new(directed: impl Into<String>) -> Self {
        Self {
            directed: directed.into(),
            ..Default::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed.trim() == "1" || self.directed.trim().eq_ignore_ascii_case("true")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Potential
// ────────────────────────────────────────────────────────────────────────────

/// A probability or utility table. Everything besides the scalar fields and
/// `AdditionalProperties` is carried as opaque `content`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potential {
    /// e.g. `"Table"`.
    #[serde(rename = "type")]
    pub pot_type: String,
    /// e.g. `"ConditionalProbability"`, `"Utility"`.
    pub role: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub additional_properties: Properties,
    #[serde(default)]
    pub content: Vec<XmlElement>,
    /// Character data directly inside the `Potential` element.
    #[serde(default)]
    pub text: Option<String>,
}

impl Potential {
    pub fn new(pot_type: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            pot_type: pot_type.into(),
            role: role.into(),
            ..Default::default()
        }
    }
}

/// Variables keyed by name; a key that disagrees with the variable's own
/// name is rejected.
mod variable_map {
    use super::Variable;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, Variable>, D::Error> {
        let variables = IndexMap::<String, Variable>::deserialize(deserializer)?;
        for (key, variable) in &variables {
            if key != &variable.name {
                return Err(serde::de::Error::custom(format!(
                    "variable keyed '{}' is named '{}'",
                    key, variable.name
                )));
            }
        }
        Ok(variables)
    }
}

/// Edges as a JSON-friendly list of `{var1, var2, ...}` records.
mod edge_list {
    use super::{Edge, EdgeKey};
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct EdgeRecord {
        var1: String,
        var2: String,
        #[serde(flatten)]
        edge: Edge,
    }

    pub fn serialize<S: Serializer>(
        edges: &IndexMap<EdgeKey, Edge>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let records: Vec<EdgeRecord> = edges
            .iter()
            .map(|(k, e)| EdgeRecord {
                var1: k.from.clone(),
                var2: k.to.clone(),
                edge: e.clone(),
            })
            .collect();
        records.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<EdgeKey, Edge>, D::Error> {
        let records = Vec::<EdgeRecord>::deserialize(deserializer)?;
        let mut edges = IndexMap::with_capacity(records.len());
        for r in records {
            let key = EdgeKey::new(r.var1, r.var2);
            if edges.contains_key(&key) {
                return Err(serde::de::Error::custom(format!("duplicate link {}", key)));
            }
            edges.insert(key, r.edge);
        }
        Ok(edges)
    }
}
