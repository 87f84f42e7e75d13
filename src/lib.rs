//! Macroflow: macro-to-macro dataflow extraction for placement seeding.
//!
//! This library estimates how strongly two fixed placement blocks
//! ("macros") of a gate-level netlist are coupled by signal propagation.
//! It enumerates every depth-bounded path between macro pairs with a
//! backtracking search over the netlist's node/pin/net structure, then
//! folds the paths into a weighted macro-to-macro flow matrix: a path with
//! `k` interior registers contributes `0.5^k`, so affinity decays with
//! every clocked stage between two blocks. Placement heuristics read the
//! matrix as "how close should these two macros sit".
//!
//! # Main Workflows
//!
//! 1. **Extraction** ([`extract`]): compute the flow matrix and export it
//!    as CSV for downstream tooling.
//! 2. **Analysis** ([`analyse`]): dump the discovered paths hop by hop for
//!    a human reader, optionally with a Graphviz view of the flow graph.
//!
//! # Usage Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use macroflow::classify::{ClockPredicate, classify};
//! use macroflow::dataflow::compute_flow;
//! use macroflow::read_netlist;
//! use std::path::Path;
//!
//! // Read a netlist description from a file
//! let netlist = read_netlist(Path::new("design.netlist"))?;
//!
//! // Classify nodes, then search and aggregate with a depth bound of 3
//! let classes = classify(&netlist, &ClockPredicate::default());
//! let (paths, matrix) = compute_flow(&netlist, &classes, 3)?;
//!
//! for path in &paths {
//!     println!("{} hops, weight {}", path.hops.len(), path.weight());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - **[`netlist`]**: the immutable netlist model (nodes, pins, nets,
//!   macros) and the description-format parser
//! - **[`classify`]**: the one-time node classification pass and the
//!   pluggable clock-pin predicate
//! - **[`dataflow`]**: the core: traversal state, bounded path search,
//!   flow aggregation and CSV serialisation
//! - **[`analyse`]**: the human-readable path report command
//! - **[`extract`]**: the CSV export command

use anyhow::Result;
use clap::Parser;
use std::{fs, path::Path};

pub mod analyse;
pub mod classify;
pub mod dataflow;
pub mod extract;
pub mod netlist;

// Re-export the main entry points for easy access
pub use analyse::{AnalyseArgs, analyse_main};
pub use classify::{Classification, ClockPredicate, NodeKind, classify};
pub use dataflow::{FlowMatrix, Hop, Path as FlowPath, compute_flow, find_macro_paths};
pub use extract::{ExtractArgs, extract_main};
pub use netlist::{Netlist, Symbol};

/// Reads and parses a netlist description from a file.
pub fn read_netlist(file_name: &Path) -> Result<netlist::Netlist> {
    let file = fs::read_to_string(file_name)?;
    Ok(netlist::parse(&file)?)
}

/// Command-line interface arguments for the macroflow tools.
///
/// This enum defines the main commands available:
/// - `Extract`: Compute the flow matrix and export it as CSV
/// - `Analyse`: Dump the discovered macro-to-macro paths for inspection
#[derive(Debug, Parser)]
#[clap(
    name = "Macroflow",
    about = "Macro-to-macro dataflow extraction for placement seeding"
)]
pub enum CLIArguments {
    /// Compute the macro-to-macro flow matrix and write it as CSV.
    Extract(ExtractArgs),
    /// Enumerate the macro-to-macro paths and report them hop by hop.
    Analyse(AnalyseArgs),
}
