// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tarjan's strongly connected components and root detection.
//!
//! Because [`Dag`] never holds a cycle, every component is a singleton. The
//! algorithm is still run in full: root detection is defined over components,
//! and a singleton component whose node has no incoming edges is a candidate
//! root. Whether exactly one root is required is the engine's policy.

use crate::graph::{Dag, NodeId};
use crate::traits::Identity;

#[derive(Debug, Clone, Copy, Default)]
struct VertexRecord {
    index: Option<usize>,
    lowlink: usize,
    on_stack: bool,
}

struct Tarjan<'a> {
    adjacency: &'a [Vec<NodeId>],
    records: Vec<VertexRecord>,
    stack: Vec<NodeId>,
    next_index: usize,
    components: Vec<Vec<NodeId>>,
}

impl<'a> Tarjan<'a> {
    fn new(adjacency: &'a [Vec<NodeId>]) -> Self {
        Self {
            adjacency,
            records: vec![VertexRecord::default(); adjacency.len()],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn open(&mut self, v: NodeId) {
        self.records[v.index()] = VertexRecord {
            index: Some(self.next_index),
            lowlink: self.next_index,
            on_stack: true,
        };
        self.next_index += 1;
        self.stack.push(v);
    }

    /// Depth-first from `root` with an explicit frame stack; each frame is a
    /// node and the position of the next successor to try.
    fn strong_connect(&mut self, root: NodeId) {
        let adjacency = self.adjacency;
        let mut frames = vec![(root, 0usize)];
        self.open(root);

        while let Some(frame) = frames.last_mut() {
            let (v, next) = *frame;
            let vi = v.index();

            if let Some(&w) = adjacency[vi].get(next) {
                frame.1 += 1;
                let wi = w.index();
                match self.records[wi].index {
                    None => {
                        self.open(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) if self.records[wi].on_stack => {
                        self.records[vi].lowlink = self.records[vi].lowlink.min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            let lowlink = self.records[vi].lowlink;
            if let Some(&(parent, _)) = frames.last() {
                let parent = &mut self.records[parent.index()];
                parent.lowlink = parent.lowlink.min(lowlink);
            }

            if Some(lowlink) == self.records[vi].index {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.records[w.index()].on_stack = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}

impl<T: Identity> Dag<T> {
    /// Tarjan's algorithm. Roots are tried in node insertion order; components
    /// come back in reverse topological discovery order (sinks first).
    pub fn strongly_connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut tarjan = Tarjan::new(self.adjacency());

        for node in self.nodes() {
            if tarjan.records[node.id().index()].index.is_none() {
                tarjan.strong_connect(node.id());
            }
        }

        tarjan.components
    }

    /// Nodes that form a singleton component with no incoming edges, in node
    /// insertion order.
    pub fn root_candidates(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self
            .strongly_connected_components()
            .into_iter()
            .filter(|component| component.len() == 1)
            .map(|component| component[0])
            .filter(|node| self.in_degree(*node) == 0)
            .collect();
        roots.sort();
        roots
    }
}
