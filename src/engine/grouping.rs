use std::collections::{BTreeMap, BTreeSet, HashMap};

use eframe::egui::{Color32, Pos2};

use crate::graph::{GraphNode, GraphSnapshot, Lens};
use crate::util::{feature_group, infer_directory, string_color};

pub const HIGH_CONFIDENCE: &str = "high-confidence";
pub const MEDIUM_CONFIDENCE: &str = "medium-confidence";
pub const LOW_CONFIDENCE: &str = "low-confidence";
pub const UNCLASSIFIED: &str = "unclassified";

const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.8;
const MEDIUM_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_CONFIDENCE: f32 = 0.5;
const UNKNOWN_FEATURE: &str = "Unknown";

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGroup {
    pub id: String,
    pub name: String,
    /// Member node indices into the snapshot arena.
    pub nodes: Vec<usize>,
    pub center: Pos2,
    pub radius: f32,
    pub color: Color32,
}

impl NodeGroup {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundledEdge {
    pub source_group: usize,
    pub target_group: usize,
    pub count: usize,
    pub types: BTreeSet<String>,
}

impl BundledEdge {
    pub fn key(&self, groups: &GroupSet) -> String {
        format!(
            "{}->{}",
            groups.groups[self.source_group].id, groups.groups[self.target_group].id
        )
    }
}

/// Partition of a snapshot's nodes into groups, ordered by group id.
#[derive(Clone, Debug, Default)]
pub struct GroupSet {
    pub groups: Vec<NodeGroup>,
    index_by_id: HashMap<String, usize>,
    group_of_node: Vec<usize>,
}

impl GroupSet {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&NodeGroup> {
        self.index_of(id).map(|index| &self.groups[index])
    }

    pub fn group_of(&self, node_index: usize) -> Option<usize> {
        self.group_of_node.get(node_index).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupingRule {
    Directory,
    Feature,
    Classification,
    ConfidenceTier,
}

impl GroupingRule {
    fn for_lens(lens: Lens) -> Self {
        match lens {
            Lens::Structure | Lens::Unknown => Self::Directory,
            Lens::Business => Self::Feature,
            Lens::Infra => Self::Classification,
            Lens::Pattern => Self::ConfidenceTier,
        }
    }

    fn key(self, node: &GraphNode) -> String {
        match self {
            Self::Directory => infer_directory(&node.label),
            Self::Feature => match node.feature_context.as_deref().map(str::trim) {
                Some(feature) if !feature.is_empty() && feature != UNKNOWN_FEATURE => {
                    feature.to_owned()
                }
                _ => feature_group(&node.label),
            },
            Self::Classification => node
                .classification
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(UNCLASSIFIED)
                .to_owned(),
            Self::ConfidenceTier => confidence_tier(node.confidence).to_owned(),
        }
    }
}

pub fn confidence_tier(confidence: Option<f32>) -> &'static str {
    let confidence = confidence.unwrap_or(DEFAULT_CONFIDENCE);
    if confidence >= HIGH_CONFIDENCE_THRESHOLD {
        HIGH_CONFIDENCE
    } else if confidence >= MEDIUM_CONFIDENCE_THRESHOLD {
        MEDIUM_CONFIDENCE
    } else {
        LOW_CONFIDENCE
    }
}

pub fn group_key(node: &GraphNode, lens: Lens) -> String {
    GroupingRule::for_lens(lens).key(node)
}

/// Assigns every node to exactly one group for `lens`. Positions and radii are left at
/// their defaults for the layout engine to fill in.
pub fn group_nodes(snapshot: &GraphSnapshot, lens: Lens) -> GroupSet {
    let rule = GroupingRule::for_lens(lens);

    let mut members: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, node) in snapshot.nodes().iter().enumerate() {
        members.entry(rule.key(node)).or_default().push(index);
    }

    let mut groups = Vec::with_capacity(members.len());
    let mut index_by_id = HashMap::with_capacity(members.len());
    let mut group_of_node = vec![0; snapshot.node_count()];
    for (group_index, (id, nodes)) in members.into_iter().enumerate() {
        for &node in &nodes {
            group_of_node[node] = group_index;
        }
        index_by_id.insert(id.clone(), group_index);
        groups.push(NodeGroup {
            name: id.clone(),
            color: string_color(&id),
            id,
            nodes,
            center: Pos2::ZERO,
            radius: 0.0,
        });
    }

    GroupSet {
        groups,
        index_by_id,
        group_of_node,
    }
}

/// Folds raw edges into one bundle per ordered pair of differing groups. Intra-group
/// edges are left out.
pub fn bundle_edges(snapshot: &GraphSnapshot, groups: &GroupSet) -> Vec<BundledEdge> {
    let mut bundles: Vec<BundledEdge> = Vec::new();
    let mut index_by_pair: HashMap<(usize, usize), usize> = HashMap::new();

    for resolved in snapshot.resolved_edges() {
        let (Some(source_group), Some(target_group)) = (
            groups.group_of(resolved.source),
            groups.group_of(resolved.target),
        ) else {
            continue;
        };
        if source_group == target_group {
            continue;
        }

        let slot = *index_by_pair
            .entry((source_group, target_group))
            .or_insert_with(|| {
                bundles.push(BundledEdge {
                    source_group,
                    target_group,
                    count: 0,
                    types: BTreeSet::new(),
                });
                bundles.len() - 1
            });

        let bundle = &mut bundles[slot];
        bundle.count += 1;
        bundle
            .types
            .insert(snapshot.edge(resolved).edge_type.clone());
    }

    bundles
}
