//! Variable DAG backed by petgraph, with cycle rejection on every edge set.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{Dfs, EdgeRef};
use petgraph::Direction;

use counterfact_core::errors::{ScmError, ScmResult};

/// Directed acyclic graph over variable names.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    graph: StableGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl CausalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning the existing index if already present.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Replace the incoming edges of `child` with `parents -> child`.
    ///
    /// All edges are checked before any is written, so a rejected call
    /// leaves the graph unchanged.
    pub fn set_parents(&mut self, child: &str, parents: &[String]) -> ScmResult<()> {
        let child_idx = self.index(child)?;
        let mut parent_idx = Vec::with_capacity(parents.len());
        for parent in parents {
            let idx = self.index(parent)?;
            if self.would_create_cycle(idx, child_idx) {
                return Err(ScmError::CycleDetected {
                    parent: parent.clone(),
                    child: child.to_string(),
                });
            }
            parent_idx.push(idx);
        }

        let incoming: Vec<_> = self
            .graph
            .edges_directed(child_idx, Direction::Incoming)
            .map(|e| e.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
        for idx in parent_idx {
            if self.graph.find_edge(idx, child_idx).is_none() {
                self.graph.add_edge(idx, child_idx, ());
            }
        }
        Ok(())
    }

    /// Parents of `name` in the base graph, sorted by name.
    pub fn parents(&self, name: &str) -> ScmResult<Vec<String>> {
        self.neighbors(name, Direction::Incoming)
    }

    pub fn children(&self, name: &str) -> ScmResult<Vec<String>> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Variable names in a topological order.
    pub fn topological_order(&self) -> ScmResult<Vec<String>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .map_err(|cycle| {
                let name = self.graph[cycle.node_id()].clone();
                ScmError::CycleDetected {
                    parent: name.clone(),
                    child: name,
                }
            })
    }

    /// Whether adding `source -> target` would close a cycle.
    pub fn would_create_cycle(&self, source: NodeIndex, target: NodeIndex) -> bool {
        if source == target {
            return true;
        }
        self.has_path(target, source)
    }

    fn has_path(&self, from: NodeIndex, to: NodeIndex) -> bool {
        let mut dfs = Dfs::new(&self.graph, from);
        while let Some(node) = dfs.next(&self.graph) {
            if node == to {
                return true;
            }
        }
        false
    }

    fn neighbors(&self, name: &str, direction: Direction) -> ScmResult<Vec<String>> {
        let idx = self.index(name)?;
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn index(&self, name: &str) -> ScmResult<NodeIndex> {
        self.node_index
            .get(name)
            .copied()
            .ok_or_else(|| ScmError::UnknownVariable {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(names: &[&str]) -> CausalGraph {
        let mut g = CausalGraph::new();
        for n in names {
            g.add_node(n);
        }
        g
    }

    #[test]
    fn set_parents_replaces_incoming_edges() {
        let mut g = graph(&["a", "b", "c"]);
        g.set_parents("c", &["a".into()]).unwrap();
        g.set_parents("c", &["b".into()]).unwrap();
        assert_eq!(g.parents("c").unwrap(), vec!["b".to_string()]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn cycle_is_rejected_without_mutation() {
        let mut g = graph(&["a", "b"]);
        g.set_parents("b", &["a".into()]).unwrap();
        let err = g.set_parents("a", &["b".into()]).unwrap_err();
        assert!(matches!(err, ScmError::CycleDetected { .. }));
        assert!(g.parents("a").unwrap().is_empty());
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut g = graph(&["a"]);
        assert!(g.set_parents("a", &["a".into()]).is_err());
    }

    #[test]
    fn topological_order_respects_edges() {
        let mut g = graph(&["c", "b", "a"]);
        g.set_parents("c", &["b".into()]).unwrap();
        g.set_parents("b", &["a".into()]).unwrap();
        let order = g.topological_order().unwrap();
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn unknown_parent_errors() {
        let mut g = graph(&["a"]);
        let err = g.set_parents("a", &["ghost".into()]).unwrap_err();
        assert_eq!(
            err,
            ScmError::UnknownVariable {
                name: "ghost".into()
            }
        );
    }
}
