use std::collections::BTreeMap;

use propscape_common::{Color, NodeId, Shape, Transform};

/// Everything a scene graph needs to build a render proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyDesc {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
    pub mesh: Option<String>,
}

/// Errors from scene-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node budget of {limit} exhausted while adding {name}")]
    BudgetExhausted { name: String, limit: usize },
    #[error("scene graph rejected node {name}: {reason}")]
    Rejected { name: String, reason: String },
}

/// The render-side collaborator. Implementations own the actual meshes.
///
/// Unknown node ids are ignored by every method except `add_node`.
pub trait SceneGraph {
    fn add_node(&mut self, desc: &ProxyDesc) -> Result<NodeId, SceneError>;

    /// Remove a node. Returns false if it was not present.
    fn remove_node(&mut self, node: NodeId) -> bool;

    fn set_transform(&mut self, node: NodeId, transform: Transform);

    fn set_color(&mut self, node: NodeId, color: Color);
}

/// One node of a [`HeadlessScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
    pub mesh: Option<String>,
}

/// In-memory scene graph. Keeps nodes in creation order.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
    node_limit: Option<usize>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene that refuses to hold more than `limit` nodes.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            node_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }
}

impl SceneGraph for HeadlessScene {
    fn add_node(&mut self, desc: &ProxyDesc) -> Result<NodeId, SceneError> {
        if let Some(limit) = self.node_limit {
            if self.nodes.len() >= limit {
                return Err(SceneError::BudgetExhausted {
                    name: desc.name.clone(),
                    limit,
                });
            }
        }
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            SceneNode {
                name: desc.name.clone(),
                shape: desc.shape,
                transform: desc.transform,
                color: desc.color,
                mesh: desc.mesh.clone(),
            },
        );
        Ok(id)
    }

    fn remove_node(&mut self, node: NodeId) -> bool {
        self.nodes.remove(&node).is_some()
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.transform = transform;
        }
    }

    fn set_color(&mut self, node: NodeId, color: Color) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.color = color;
        }
    }
}
