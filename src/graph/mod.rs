use serde::{Deserialize, Serialize};

pub mod builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NodeGroup {
    Root,
    Prod,
    Dev,
    Transitive,
}

impl NodeGroup {
    pub const ALL: [NodeGroup; 4] = [
        NodeGroup::Root,
        NodeGroup::Prod,
        NodeGroup::Dev,
        NodeGroup::Transitive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeGroup::Root => "root",
            NodeGroup::Prod => "prod",
            NodeGroup::Dev => "dev",
            NodeGroup::Transitive => "transitive",
        }
    }
}

impl From<NodeGroup> for u8 {
    fn from(group: NodeGroup) -> Self {
        match group {
            NodeGroup::Root => 0,
            NodeGroup::Prod => 1,
            NodeGroup::Dev => 2,
            NodeGroup::Transitive => 3,
        }
    }
}

impl TryFrom<u8> for NodeGroup {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeGroup::Root),
            1 => Ok(NodeGroup::Prod),
            2 => Ok(NodeGroup::Dev),
            3 => Ok(NodeGroup::Transitive),
            other => Err(format!("unknown node group {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub group: NodeGroup,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub prod: usize,
    pub dev: usize,
    pub transitive: usize,
    pub nodes: usize,
    pub links: usize,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.group == NodeGroup::Root)
    }

    pub fn incident_links(&self, id: &str) -> usize {
        self.links
            .iter()
            .filter(|link| link.source == id || link.target == id)
            .count()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            nodes: self.nodes.len(),
            links: self.links.len(),
            ..GraphSummary::default()
        };
        for node in &self.nodes {
            match node.group {
                NodeGroup::Root => {}
                NodeGroup::Prod => summary.prod += 1,
                NodeGroup::Dev => summary.dev += 1,
                NodeGroup::Transitive => summary.transitive += 1,
            }
        }
        summary
    }
}
