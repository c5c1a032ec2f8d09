//! Graph container: a directed flag plus node and edge lists.
//!
//! Edges reference nodes by id value only. Ids are not checked against the
//! node list, so a graph may carry dangling edges.

use crate::Value;
use serde::Serialize;

/// A node entry of a [`Graph`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: Value,
    pub label: Option<String>,
}

/// An edge entry of a [`Graph`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: Value,
    pub to: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
}

/// A plain graph container.
///
/// # Examples
///
/// ```rust
/// use ifamily::{Graph, Value};
///
/// let mut graph = Graph::new(true);
/// graph.add_node(1, Some("start"));
/// graph.add_node(2, None::<&str>);
/// graph.add_edge(1, 2, Some(Value::from(0.5)));
///
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges[0].weight, Some(Value::from(0.5)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Graph {
    pub directed: bool,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Graph {
            directed,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node<S: Into<String>>(&mut self, id: impl Into<Value>, label: Option<S>) {
        self.nodes.push(GraphNode {
            id: id.into(),
            label: label.map(Into::into),
        });
    }

    pub fn add_edge(&mut self, from: impl Into<Value>, to: impl Into<Value>, weight: Option<Value>) {
        self.edges.push(GraphEdge {
            from: from.into(),
            to: to.into(),
            weight,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_edges_are_allowed() {
        let mut graph = Graph::new(false);
        graph.add_node("a", Some("A"));
        graph.add_edge("a", "missing", None);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].to, Value::from("missing"));
    }

    #[test]
    fn test_node_order_matters() {
        let mut ab = Graph::new(true);
        ab.add_node(1, None::<String>);
        ab.add_node(2, None::<String>);

        let mut ba = Graph::new(true);
        ba.add_node(2, None::<String>);
        ba.add_node(1, None::<String>);

        assert_ne!(ab, ba);
    }
}
