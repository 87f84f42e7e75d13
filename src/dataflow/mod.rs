//! Macro-to-macro dataflow extraction.
//!
//! This is the core of the crate: a bounded backtracking search that
//! enumerates every signal-propagation path between macro pairs, and the
//! aggregation that folds those paths into a weighted flow matrix.
//!
//! # Model
//!
//! A [`Hop`] is one step of signal propagation: leave a node through an
//! OUTPUT pin, cross that pin's net, arrive at an INPUT pin of another
//! node. A [`Path`] is a hop sequence that starts at a macro (the start
//! node carries no incoming hop) and ends at a macro; IO terminals never
//! appear, and no node, net or pin repeats within one path.
//!
//! # Search
//!
//! Each macro seeds an independent [`TraversalState`] and the search
//! explores outward depth-first ([`search_from`]), terminating every branch
//! on the first macro it reaches. The depth bound counts interior
//! *registers*, not raw hops: arbitrarily long combinational stretches are
//! allowed, but a branch stops expanding once it has consumed more clocked
//! stages than the bound permits. Per-macro searches share nothing but the
//! read-only netlist, so [`find_macro_paths`] fans them out across the
//! rayon pool and concatenates the results.
//!
//! # Aggregation
//!
//! A path with `k` interior registers contributes `0.5^k` to the matrix
//! entry of its ordered (start, end) macro pair; every extra clocked stage
//! between two macros halves their affinity ([`aggregate_flow`]).
//!
//! # Example
//!
//! ```
//! use macroflow::classify::{ClockPredicate, classify};
//! use macroflow::dataflow::compute_flow;
//! use macroflow::netlist::parse;
//!
//! let netlist = parse(r#"
//!     macro "m0" [out "q" -> "n1"]
//!     macro "m1" [in "d" <- "n1"]
//! "#).unwrap();
//! let classes = classify(&netlist, &ClockPredicate::default());
//!
//! let (paths, matrix) = compute_flow(&netlist, &classes, 3).unwrap();
//! assert_eq!(paths.len(), 1);
//! assert_eq!(matrix.get(0, 1), 1.0);
//! ```

pub mod matrix;
pub mod search;
pub mod serialisation;
pub mod state;

pub use matrix::{FlowMatrix, aggregate_flow, macro_flow_graph, macro_names};
pub use search::{find_macro_paths, search_from};
pub use state::{Membership, TraversalState};

use anyhow::Result;

use crate::classify::Classification;
use crate::netlist::{NetId, Netlist, NodeId, PinId};

/// One directed step of signal propagation.
///
/// `from != to` always holds: a candidate hop back onto its own source node
/// is discarded during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from: NodeId,
    pub from_pin: PinId,
    pub net: NetId,
    pub to_pin: PinId,
    pub to: NodeId,
}

/// A completed macro-to-macro path.
///
/// The start macro has no incoming hop and is stored as an explicit field;
/// the final hop's destination is the end macro. `register_depth` counts
/// the interior nodes classified as registers and fixes the path's weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub start: NodeId,
    pub hops: Vec<Hop>,
    pub register_depth: usize,
}

impl Path {
    /// The macro this path terminates on.
    pub fn end(&self) -> NodeId {
        self.hops.last().expect("path has at least one hop").to
    }

    /// Decayed contribution of this path: `0.5^register_depth`.
    pub fn weight(&self) -> f64 {
        0.5f64.powi(self.register_depth as i32)
    }
}

/// Run the full pipeline on a classified netlist: search every macro, then
/// aggregate the discovered paths into the flow matrix.
pub fn compute_flow(
    netlist: &Netlist,
    classes: &Classification,
    depth_max: i32,
) -> Result<(Vec<Path>, FlowMatrix)> {
    let paths = find_macro_paths(netlist, classes, depth_max);
    let matrix = aggregate_flow(&paths, classes)?;
    Ok((paths, matrix))
}
