//! Flow-matrix aggregation and the derived macro-flow graph.

use anyhow::{Result, anyhow};
use petgraph::stable_graph::StableGraph;

use crate::classify::Classification;
use crate::netlist::{Netlist, Symbol};

use super::Path;

/// `M x M` matrix of accumulated path weights, row = source macro index,
/// column = destination macro index, row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl FlowMatrix {
    pub fn new(dim: usize) -> Self {
        FlowMatrix {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.dim && col < self.dim,
            "macro index out of range: ({}, {}) in a {}x{} matrix",
            row,
            col,
            self.dim,
            self.dim,
        );
        row * self.dim + col
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[self.index(row, col)]
    }

    /// Accumulate a weight; entries only ever grow, never get overwritten.
    pub fn add(&mut self, row: usize, col: usize, weight: f64) {
        let index = self.index(row, col);
        self.values[index] += weight;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let base = self.index(row, 0);
        &self.values[base..base + self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty matrix has no rows to yield anyway.
        self.values.chunks(self.dim.max(1))
    }

    /// The whole matrix as one row-major slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Fold the discovered paths into the flow matrix.
///
/// A path endpoint that does not classify as a macro is a broken invariant
/// and aborts the computation rather than producing silently wrong numbers.
pub fn aggregate_flow(paths: &[Path], classes: &Classification) -> Result<FlowMatrix> {
    let mut matrix = FlowMatrix::new(classes.macro_count());
    for path in paths.iter() {
        let src = classes
            .macro_index(path.start)
            .ok_or_else(|| anyhow!("path starts on node {}, which is not a macro", path.start.0))?;
        let dst = classes
            .macro_index(path.end())
            .ok_or_else(|| anyhow!("path ends on node {}, which is not a macro", path.end().0))?;
        matrix.add(src, dst, path.weight());
    }
    Ok(matrix)
}

/// Macro names in index order, for matrix headers and graph labels.
pub fn macro_names(netlist: &Netlist, classes: &Classification) -> Vec<Symbol> {
    classes
        .macro_nodes()
        .iter()
        .map(|id| netlist.node(*id).name.clone())
        .collect()
}

/// Render the matrix as a directed macro graph, one edge per non-zero
/// entry, suitable for Graphviz dumping.
pub fn macro_flow_graph(matrix: &FlowMatrix, names: &[Symbol]) -> StableGraph<Symbol, f64> {
    let mut graph = StableGraph::new();
    let indices: Vec<_> = names.iter().map(|name| graph.add_node(name.clone())).collect();
    for (row, row_values) in matrix.rows().enumerate() {
        for (col, weight) in row_values.iter().enumerate() {
            if *weight > 0.0 {
                graph.add_edge(indices[row], indices[col], *weight);
            }
        }
    }
    graph
}
