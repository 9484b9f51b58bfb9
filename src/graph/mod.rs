// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Generic DAG topology: cycle-free edge insertion, Tarjan SCC root detection,
//! topological ordering and leaf classification.

mod dag;
mod scc;
mod topo;

pub use dag::{Dag, Edge, Node, NodeId};
