// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Node/edge storage and cycle prevention.
//!
//! The graph is acyclic by construction: `add_edge` runs a depth-first
//! reachability check before inserting, so no observable state of a [`Dag`] ever
//! contains a cycle. Successor lists and in-degrees are kept up to date on every
//! insertion, so the check is O(V + E) per edge and degree queries are O(1).

use std::collections::HashSet;
use std::fmt;

use crate::errors::GraphError;
use crate::traits::Identity;

/// Opaque handle to a node, valid only for the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A graph node owning one value.
#[derive(Debug, Clone)]
pub struct Node<T> {
    id: NodeId,
    value: T,
}

impl<T> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Directed edge `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// Directed acyclic graph over values exposing a stable identity.
///
/// Nodes and edges live in graph-owned sequences. Edge order is discovery order
/// and only affects the order neighbors are reported in.
#[derive(Debug, Clone)]
pub struct Dag<T> {
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
    successors: Vec<Vec<NodeId>>,
    in_degrees: Vec<usize>,
}

impl<T> Default for Dag<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            successors: Vec::new(),
            in_degrees: Vec::new(),
        }
    }
}

impl<T: Identity> Dag<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` in a node and append it. Never fails.
    pub fn add_node(&mut self, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { id, value });
        self.successors.push(Vec::new());
        self.in_degrees.push(0);
        id
    }

    /// Append the edge `from -> to`.
    ///
    /// Rejected with [`GraphError::Cycle`] when `from` is already reachable from
    /// `to`, which also covers self-loops. A rejected edge leaves the edge set
    /// untouched.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;

        if self.has_path(to, from) {
            return Err(GraphError::Cycle {
                from: self.value(from).identity(),
                to: self.value(to).identity(),
            });
        }

        self.edges.push(Edge { from, to });
        self.successors[from.0].push(to);
        self.in_degrees[to.0] += 1;
        Ok(())
    }

    /// Depth-first reachability from `from` to `to`.
    ///
    /// Only the nodes reachable from `from` are touched, each at most once.
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            // Reverse so the walk follows edge-insertion order.
            stack.extend(self.successors[current.0].iter().rev().copied());
        }

        false
    }

    /// Nodes one outgoing edge away from `node`, in edge-insertion order.
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        self.successors[node.0].clone()
    }

    /// Nodes with zero outgoing edges, in node insertion order.
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        self.partition_by_out_degree().1
    }

    /// Nodes with at least one outgoing edge, in node insertion order.
    pub fn non_leaf_nodes(&self) -> Vec<NodeId> {
        self.partition_by_out_degree().0
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_degrees[node.0]
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.successors[node.0].len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// The value stored at `id`.
    ///
    /// # Panics
    /// If `id` was not produced by this graph.
    pub fn value(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }

    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Successor lists indexed by node, in edge-insertion order.
    pub(crate) fn adjacency(&self) -> &[Vec<NodeId>] {
        &self.successors
    }

    fn partition_by_out_degree(&self) -> (Vec<NodeId>, Vec<NodeId>) {
        self.nodes
            .iter()
            .map(|node| node.id)
            .partition(|id| !self.successors[id.0].is_empty())
    }

    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

/// One `from -> to` line per edge, in edge-insertion order.
impl<T: Identity> fmt::Display for Dag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in &self.edges {
            writeln!(
                f,
                "{} -> {}",
                self.value(edge.from).identity(),
                self.value(edge.to).identity()
            )?;
        }
        Ok(())
    }
}
