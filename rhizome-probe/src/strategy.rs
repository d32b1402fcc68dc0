use crate::error::Result;
use crate::model::{Edge, EdgeKind, Node};
use async_trait::async_trait;

/// A pluggable probe that expands one node into candidate nodes and
/// edges. Implementations check the input node's kind themselves and
/// return an empty proposal list when inapplicable; they never mutate
/// engine state. The traversal engine catches an `Err` at the call site
/// and treats it as "no contribution for this node".
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &'static str;

    /// Probe one node. Every returned edge's source is the input node;
    /// the order of proposals only matters for deterministic display.
    async fn execute(&self, node: &Node) -> Result<Vec<(Node, Edge)>>;
}

/// Build one `(target, edge)` proposal rooted at `source`.
pub fn propose(source: &Node, target: Node, kind: EdgeKind) -> (Node, Edge) {
    let edge = Edge::new(source.clone(), target.clone(), kind);
    (target, edge)
}
