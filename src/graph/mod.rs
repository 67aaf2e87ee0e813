// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod directed;
mod topo;

pub use directed::{DirectedGraph, Edge, GraphBuilder};
pub use topo::CycleError;
