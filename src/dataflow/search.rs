//! The bounded depth-first path search.
//!
//! One search runs per start macro, each with its own [`TraversalState`].
//! Candidates leaving the frontier are enumerated pins-first: every OUTPUT
//! pin of the frontier reaches, through its net, every INPUT pin of every
//! other node on that net. A candidate is dropped when the visited sets
//! reject it or its destination is an IO terminal; a candidate landing on a
//! macro completes a path without being recursed past; anything else is
//! pushed, explored, and popped again.
//!
//! Termination: every recursive step either ends on a macro, grows the
//! visited-node set by one (bounded by the node count), or is cut off by
//! the register-depth bound.

use rayon::prelude::*;

use crate::classify::{Classification, NodeKind};
use crate::netlist::{Netlist, NodeId, PinDirection};

use super::state::{Membership, TraversalState};
use super::{Hop, Path};

/// Enumerate every hop leaving `frontier`.
pub fn candidate_hops(netlist: &Netlist, frontier: NodeId) -> Vec<Hop> {
    let mut hops = Vec::new();
    for from_pin in netlist.node(frontier).pins.iter() {
        let pin = netlist.pin(*from_pin);
        if pin.direction != PinDirection::Output {
            continue;
        }
        for to_pin in netlist.net(pin.net).pins.iter() {
            let other = netlist.pin(*to_pin);
            if other.direction != PinDirection::Input {
                continue;
            }
            if other.node == frontier {
                // A net cannot loop a signal back onto its own driver, but
                // the model does not forbid such a pin arrangement.
                continue;
            }
            hops.push(Hop {
                from: frontier,
                from_pin: *from_pin,
                net: pin.net,
                to_pin: *to_pin,
                to: other.node,
            });
        }
    }
    hops
}

/// Discover all macro-to-macro paths from every start macro.
///
/// The per-macro searches are independent over the read-only netlist, so
/// they fan out across the rayon pool; concatenation order follows the
/// macro index order, keeping the result deterministic.
pub fn find_macro_paths(netlist: &Netlist, classes: &Classification, depth_max: i32) -> Vec<Path> {
    classes
        .macro_nodes()
        .par_iter()
        .flat_map(|start| search_from(netlist, classes, *start, depth_max))
        .collect()
}

/// Discover all paths from one start macro.
///
/// A negative `depth_max` admits no expansion at all and yields an empty
/// set; `depth_max = 0` admits purely combinational paths.
pub fn search_from(
    netlist: &Netlist,
    classes: &Classification,
    start: NodeId,
    depth_max: i32,
) -> Vec<Path> {
    let mut state = TraversalState::new(start);
    let mut paths = Vec::new();
    extend(netlist, classes, depth_max, &mut state, &mut paths);
    paths
}

fn extend(
    netlist: &Netlist,
    classes: &Classification,
    depth_max: i32,
    state: &mut TraversalState,
    paths: &mut Vec<Path>,
) {
    // The frontier itself was legally reached; only further expansion is
    // cut once the trail holds more clocked stages than the bound allows.
    if state.register_depth() as i64 > i64::from(depth_max) {
        return;
    }

    for hop in candidate_hops(netlist, state.frontier()) {
        if state.membership(&hop) != Membership::Free {
            continue;
        }
        match classes.kind(hop.to) {
            NodeKind::Terminal => continue,
            NodeKind::Macro(_) => paths.push(state.completed(hop)),
            NodeKind::Register => {
                state.push(hop, true);
                extend(netlist, classes, depth_max, state, paths);
                state.pop();
            }
            NodeKind::Logic => {
                state.push(hop, false);
                extend(netlist, classes, depth_max, state, paths);
                state.pop();
            }
        }
    }
}
