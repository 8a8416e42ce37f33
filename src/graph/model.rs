use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Function,
    Method,
    Class,
    Interface,
    File,
    Module,
    Variable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::File => "file",
            Self::Module => "module",
            Self::Variable => "variable",
            Self::Unknown => "unknown",
        }
    }
}

/// Position of a node relative to the file a dependency query was centered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Root,
    Outgoing,
    Incoming,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            confidence: None,
            classification: None,
            feature_context: None,
            purpose_summary: None,
            direction: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    pub fn with_feature_context(mut self, feature: impl Into<String>) -> Self {
        self.feature_context = Some(feature.into());
        self
    }

    pub fn is_domain(&self) -> bool {
        self.classification
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case("domain"))
    }

    pub fn is_infrastructure(&self) -> bool {
        self.classification
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case("infrastructure"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl GraphEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
        }
    }

    pub fn key(&self) -> String {
        edge_key(&self.source, &self.target)
    }
}

pub fn edge_key(source: &str, target: &str) -> String {
    format!("{source}-{target}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lens {
    #[default]
    Structure,
    Business,
    Infra,
    Pattern,
    #[serde(other)]
    Unknown,
}

impl Lens {
    pub const ALL: [Lens; 4] = [Lens::Structure, Lens::Business, Lens::Infra, Lens::Pattern];

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "structure" => Self::Structure,
            "business" => Self::Business,
            "infra" => Self::Infra,
            "pattern" => Self::Pattern,
            other => {
                tracing::warn!(lens = other, "unrecognized lens, using circular fallback");
                Self::Unknown
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Business => "business",
            Self::Infra => "infra",
            Self::Pattern => "pattern",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Lens {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(value))
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_json_uses_camel_case_and_tolerates_unknown_kinds() {
        let raw = r#"{
            "id": "n1",
            "label": "src/a.ts",
            "kind": "enum",
            "featureContext": "billing",
            "purposeSummary": "does things"
        }"#;
        let node: GraphNode = serde_json::from_str(raw).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
        assert_eq!(node.feature_context.as_deref(), Some("billing"));
        assert_eq!(node.confidence, None);
    }

    #[test]
    fn edge_type_field_is_renamed() {
        let edge: GraphEdge =
            serde_json::from_str(r#"{"source":"a","target":"b","type":"calls"}"#).unwrap();
        assert_eq!(edge.edge_type, "calls");
        assert_eq!(edge.key(), "a-b");
    }

    #[test]
    fn unknown_lens_names_fall_back() {
        assert_eq!("Pattern".parse::<Lens>().unwrap(), Lens::Pattern);
        assert_eq!(Lens::from_name("galaxy"), Lens::Unknown);
        let lens: Lens = serde_json::from_str("\"galaxy\"").unwrap();
        assert_eq!(lens, Lens::Unknown);
    }

    #[test]
    fn classification_checks_ignore_case() {
        let node = GraphNode::new("a", "a", NodeKind::Class).with_classification("Domain");
        assert!(node.is_domain());
        assert!(!node.is_infrastructure());
    }
}
