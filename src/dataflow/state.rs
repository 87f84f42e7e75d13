//! Traversal bookkeeping for one in-progress path.
//!
//! Nets are hyperedges, so tracking visited nodes alone is not enough: two
//! hops fanning out through the same net would slip past a node-only check
//! and double count. The state therefore tracks three id sets at once
//! (nodes, nets and consumed pins) plus the running register depth, all
//! with O(1) push and pop.

use std::collections::HashSet;

use crate::netlist::{NetId, NodeId, PinId};

use super::{Hop, Path};

/// Outcome of testing a candidate hop against the visited sets.
///
/// The variants are ordered by check priority; anything other than `Free`
/// rejects the hop, the distinction only matters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Free,
    NodeRepeat,
    NetRepeat,
    PinRepeat,
}

/// Visited sets, register depth and hop trail of one search branch.
///
/// Owned exclusively by the search call stack that created it; never shared
/// across concurrent per-macro searches.
#[derive(Debug)]
pub struct TraversalState {
    start: NodeId,
    nodes: HashSet<NodeId>,
    nets: HashSet<NetId>,
    pins: HashSet<PinId>,
    register_depth: usize,
    trail: Vec<(Hop, bool)>,
}

impl TraversalState {
    /// Seed a fresh state at a start macro: no hops, only the macro's own
    /// id in the node set.
    pub fn new(start: NodeId) -> Self {
        let mut nodes = HashSet::new();
        nodes.insert(start);
        TraversalState {
            start,
            nodes,
            nets: HashSet::new(),
            pins: HashSet::new(),
            register_depth: 0,
            trail: Vec::new(),
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// The node the search currently expands from.
    pub fn frontier(&self) -> NodeId {
        self.trail.last().map_or(self.start, |(hop, _)| hop.to)
    }

    /// Interior register count of the trail so far.
    pub fn register_depth(&self) -> usize {
        self.register_depth
    }

    /// Test a candidate hop against the visited sets, in priority order:
    /// destination node, then net, then either endpoint pin.
    pub fn membership(&self, hop: &Hop) -> Membership {
        if self.nodes.contains(&hop.to) {
            Membership::NodeRepeat
        } else if self.nets.contains(&hop.net) {
            Membership::NetRepeat
        } else if self.pins.contains(&hop.from_pin) || self.pins.contains(&hop.to_pin) {
            Membership::PinRepeat
        } else {
            Membership::Free
        }
    }

    /// Extend the trail by one hop. `to_register` records whether the
    /// destination is a clocked node so `pop` can undo the depth exactly.
    pub fn push(&mut self, hop: Hop, to_register: bool) {
        self.nodes.insert(hop.to);
        self.nets.insert(hop.net);
        self.pins.insert(hop.from_pin);
        self.pins.insert(hop.to_pin);
        if to_register {
            self.register_depth += 1;
        }
        self.trail.push((hop, to_register));
    }

    /// Exact inverse of the most recent `push`.
    pub fn pop(&mut self) {
        let (hop, to_register) = self
            .trail
            .pop()
            .expect("pop on a traversal state with no hops");
        self.nodes.remove(&hop.to);
        self.nets.remove(&hop.net);
        self.pins.remove(&hop.from_pin);
        self.pins.remove(&hop.to_pin);
        if to_register {
            self.register_depth -= 1;
        }
    }

    /// Snapshot the trail plus a final hop onto a macro as a completed
    /// path. The final macro is never pushed onto the state, so sibling
    /// candidates from the same frontier keep exploring.
    pub fn completed(&self, last: Hop) -> Path {
        let mut hops: Vec<Hop> = self.trail.iter().map(|(hop, _)| *hop).collect();
        hops.push(last);
        Path {
            start: self.start,
            hops,
            register_depth: self.register_depth,
        }
    }
}
