// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GraphError;
use crate::graph::{Dag, NodeId};
use crate::traits::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl<T: Identity> Dag<T> {
    /// Order nodes so every edge points from an earlier to a later position.
    ///
    /// Depth-first post-order over nodes in insertion order, reversed. Edges
    /// already guarantee acyclicity, but a back edge found here is still reported
    /// as [`GraphError::Cycle`] rather than producing a bogus order.
    pub fn topological_sort(&self) -> Result<Vec<NodeId>, GraphError> {
        let adjacency = self.adjacency();
        let mut marks = vec![Mark::Unvisited; self.len()];
        let mut order = Vec::with_capacity(self.len());

        for node in self.nodes() {
            if marks[node.id().index()] == Mark::Unvisited {
                self.visit(node.id(), adjacency, &mut marks, &mut order)?;
            }
        }

        order.reverse();
        Ok(order)
    }

    /// Post-order walk from `start` using an explicit stack of
    /// `(node, next successor)` frames.
    fn visit(
        &self,
        start: NodeId,
        adjacency: &[Vec<NodeId>],
        marks: &mut [Mark],
        order: &mut Vec<NodeId>,
    ) -> Result<(), GraphError> {
        marks[start.index()] = Mark::InProgress;
        let mut frames = vec![(start, 0usize)];

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;

            let Some(&successor) = adjacency[node.index()].get(next) else {
                marks[node.index()] = Mark::Done;
                order.push(node);
                frames.pop();
                continue;
            };
            frame.1 += 1;

            match marks[successor.index()] {
                Mark::Unvisited => {
                    marks[successor.index()] = Mark::InProgress;
                    frames.push((successor, 0));
                }
                Mark::InProgress => {
                    return Err(GraphError::Cycle {
                        from: self.value(node).identity(),
                        to: self.value(successor).identity(),
                    })
                }
                Mark::Done => {}
            }
        }

        Ok(())
    }
}
