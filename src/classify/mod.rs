//! Node classification: the one-time pass that tags every netlist node as a
//! macro, a register, an IO terminal, or plain logic.
//!
//! Classification runs once against an immutable [`Netlist`] and produces a
//! separate immutable [`Classification`]; no node ever exists in a
//! half-classified state. The rules, in order:
//!
//! 1. every node starts as [`NodeKind::Logic`];
//! 2. terminals declared in the netlist become [`NodeKind::Terminal`];
//! 3. macro-instance nodes become [`NodeKind::Macro`] and receive their
//!    dense index from the netlist's declaration order;
//! 4. any remaining logic node with a clock-like pin name becomes
//!    [`NodeKind::Register`].
//!
//! Step 4 is a naming heuristic, not a structural fact, so the predicate is
//! pluggable: [`ClockPredicate`] wraps a caller-supplied regex and only
//! falls back to the built-in pattern when none is given.

use lazy_static::lazy_static;
use regex::Regex;

use crate::netlist::{Netlist, NodeId};

lazy_static! {
    static ref DEFAULT_CLOCK_RE: Regex =
        Regex::new(r"(?i)(^|[^a-z])(clk|clock)").expect("default clock pattern is valid");
}

/// Pin-name predicate deciding whether a node counts as clocked.
#[derive(Debug, Clone)]
pub struct ClockPredicate(Regex);

impl ClockPredicate {
    /// Build a predicate from a caller-supplied regex pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ClockPredicate(Regex::new(pattern)?))
    }

    /// Build from an optional CLI pattern, falling back to the default.
    pub fn from_option(pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            Some(pattern) => Self::new(pattern),
            None => Ok(Self::default()),
        }
    }

    pub fn matches(&self, pin_name: &str) -> bool {
        self.0.is_match(pin_name)
    }
}

impl Default for ClockPredicate {
    fn default() -> Self {
        ClockPredicate(DEFAULT_CLOCK_RE.clone())
    }
}

/// Role of a node in the searchable graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Fixed placement block; endpoint of every recorded path.
    Macro(usize),
    /// Clocked element; counts toward the depth bound and the decay weight.
    Register,
    /// External-interface terminal; excluded from the search entirely.
    Terminal,
    /// Plain combinational logic.
    Logic,
}

/// Immutable result of classification: one kind per node, plus the macro
/// nodes in index order.
#[derive(Debug, Clone)]
pub struct Classification {
    kinds: Vec<NodeKind>,
    macros: Vec<NodeId>,
}

impl Classification {
    pub fn kind(&self, id: NodeId) -> NodeKind {
        *self.kinds.get(id.0).expect("node id out of range")
    }

    pub fn macro_count(&self) -> usize {
        self.macros.len()
    }

    /// Macro nodes ordered by their dense index.
    pub fn macro_nodes(&self) -> &[NodeId] {
        &self.macros
    }

    pub fn macro_index(&self, id: NodeId) -> Option<usize> {
        match self.kind(id) {
            NodeKind::Macro(index) => Some(index),
            _ => None,
        }
    }

    /// Census of node kinds: (macros, registers, terminals, logic).
    pub fn census(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for kind in self.kinds.iter() {
            match kind {
                NodeKind::Macro(_) => counts.0 += 1,
                NodeKind::Register => counts.1 += 1,
                NodeKind::Terminal => counts.2 += 1,
                NodeKind::Logic => counts.3 += 1,
            }
        }
        counts
    }
}

/// Classify every node of the netlist in O(nodes + pins).
///
/// Zero macros is not an error: the result simply has an empty macro list
/// and downstream stages degenerate to a 0x0 flow matrix.
pub fn classify(netlist: &Netlist, clock: &ClockPredicate) -> Classification {
    let mut kinds = vec![NodeKind::Logic; netlist.node_count()];

    for (id, _) in netlist.nodes() {
        if netlist.is_terminal(id) {
            kinds[id.0] = NodeKind::Terminal;
        }
    }

    for (index, macro_id) in netlist.macros().iter().enumerate() {
        kinds[macro_id.0] = NodeKind::Macro(index);
    }

    for (id, node) in netlist.nodes() {
        if kinds[id.0] != NodeKind::Logic {
            continue;
        }
        let clocked = node
            .pins
            .iter()
            .any(|pin_id| clock.matches(netlist.pin(*pin_id).name.as_ref()));
        if clocked {
            kinds[id.0] = NodeKind::Register;
        }
    }

    Classification {
        kinds,
        macros: netlist.macros().to_vec(),
    }
}
