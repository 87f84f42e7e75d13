//! Netlist model and description-format parser.
//!
//! The netlist is the static snapshot every other module works from: arenas
//! of nodes, pins and nets cross-referenced by dense integer ids, plus the
//! ordered list of macro-instance nodes. Construction is two-phase: a
//! [`NetlistBuilder`] accumulates mutable state while the description is
//! read, then [`NetlistBuilder::finish`] freezes everything into an
//! immutable [`Netlist`]. Nothing downstream ever mutates the model.
//!
//! The on-disk format is one entry per component:
//!
//! ```text
//! macro "m0"    [out "q" -> "n1"]
//! cell  "u1"    [in "a" <- "n1", out "y" -> "n2"]
//! macro "m1"    [in "d" <- "n2"]
//! terminal "p0" [in "pad" <- "n2"]
//! ```
//!
//! Macros receive their dense index in file order; nets are created the
//! first time a pin names them. `#` starts a line comment.

pub mod ast;

lalrpop_util::lalrpop_mod! {parser, "/netlist/parser.rs"}

use std::collections::{HashMap, HashSet};
use std::{error::Error, fmt};

use anyhow::{Result, anyhow, bail};
use string_cache::DefaultAtom;

use ast::{Entry, EntryKind};

pub type Symbol = DefaultAtom;

/// Dense identifier of a node in the netlist arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Dense identifier of a pin in the netlist arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub usize);

/// Dense identifier of a net in the netlist arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    Input,
    Output,
}

/// One placement unit: a macro block, a logic cell, or an IO terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: Symbol,
    pub pins: Vec<PinId>,
}

/// A directed terminal owned by exactly one node and one net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: Symbol,
    pub direction: PinDirection,
    pub node: NodeId,
    pub net: NetId,
}

/// A hyperedge: the set of pins that can exchange a signal directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub name: Symbol,
    pub pins: Vec<PinId>,
}

/// Error response of [`parse`].
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    SyntaxError(String),
    DuplicateNode(Symbol),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::SyntaxError(err) => write!(f, "{}", err),
            ParseError::DuplicateNode(name) => {
                write!(f, "Multiple definitions of node \"{}\"", name)
            }
        }
    }
}

impl Error for ParseError {}

type LalrpopError<'a> = lalrpop_util::ParseError<usize, parser::Token<'a>, &'static str>;

impl From<LalrpopError<'_>> for ParseError {
    fn from(err: LalrpopError) -> Self {
        ParseError::SyntaxError(format!("{}", err))
    }
}

/// Mutable construction phase of a [`Netlist`].
///
/// Node and net names are interned as they arrive; nets come into existence
/// the first time a pin references them. The builder is the only way to
/// create a `Netlist`, which keeps the cross-reference invariants (a pin is
/// listed by both its node and its net) true by construction.
#[derive(Debug, Default)]
pub struct NetlistBuilder {
    nodes: Vec<Node>,
    pins: Vec<Pin>,
    nets: Vec<Net>,
    node_lut: HashMap<Symbol, NodeId>,
    net_lut: HashMap<Symbol, NetId>,
    macros: Vec<NodeId>,
    terminals: HashSet<NodeId>,
}

impl NetlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, name: Symbol) -> Result<NodeId, ParseError> {
        let id = NodeId(self.nodes.len());
        if self.node_lut.insert(name.clone(), id).is_some() {
            return Err(ParseError::DuplicateNode(name));
        }
        self.nodes.push(Node {
            name,
            pins: Vec::new(),
        });
        Ok(id)
    }

    /// Add a plain logic cell.
    pub fn add_cell(&mut self, name: Symbol) -> Result<NodeId, ParseError> {
        self.add_node(name)
    }

    /// Add a macro instance; macros are indexed in the order they are added.
    pub fn add_macro(&mut self, name: Symbol) -> Result<NodeId, ParseError> {
        let id = self.add_node(name)?;
        self.macros.push(id);
        Ok(id)
    }

    /// Add an external-interface terminal.
    pub fn add_terminal(&mut self, name: Symbol) -> Result<NodeId, ParseError> {
        let id = self.add_node(name)?;
        self.terminals.insert(id);
        Ok(id)
    }

    /// Attach a pin to `node`, interning `net` on first mention.
    pub fn add_pin(
        &mut self,
        node: NodeId,
        name: Symbol,
        direction: PinDirection,
        net: Symbol,
    ) -> PinId {
        let net_id = match self.net_lut.get(&net) {
            Some(id) => *id,
            None => {
                let id = NetId(self.nets.len());
                self.net_lut.insert(net.clone(), id);
                self.nets.push(Net {
                    name: net,
                    pins: Vec::new(),
                });
                id
            }
        };

        let pin_id = PinId(self.pins.len());
        self.pins.push(Pin {
            name,
            direction,
            node,
            net: net_id,
        });
        self.nodes[node.0].pins.push(pin_id);
        self.nets[net_id.0].pins.push(pin_id);
        pin_id
    }

    /// Freeze the builder into an immutable netlist.
    pub fn finish(self) -> Netlist {
        let NetlistBuilder {
            nodes,
            pins,
            nets,
            node_lut,
            macros,
            terminals,
            ..
        } = self;
        Netlist {
            nodes,
            pins,
            nets,
            node_lut,
            macros,
            terminals,
        }
    }
}

/// Immutable netlist snapshot: the arenas plus the macro and terminal sets.
#[derive(Debug, Clone)]
pub struct Netlist {
    nodes: Vec<Node>,
    pins: Vec<Pin>,
    nets: Vec<Net>,
    node_lut: HashMap<Symbol, NodeId>,
    macros: Vec<NodeId>,
    terminals: HashSet<NodeId>,
}

impl Netlist {
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id.0).expect("node id out of range")
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        self.pins.get(id.0).expect("pin id out of range")
    }

    pub fn net(&self, id: NetId) -> &Net {
        self.nets.get(id.0).expect("net id out of range")
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Macro-instance nodes in `macro_index` order.
    pub fn macros(&self) -> &[NodeId] {
        &self.macros
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.terminals.contains(&id)
    }

    pub fn node_named(&self, name: &str) -> Option<NodeId> {
        self.node_lut.get(&Symbol::from(name)).copied()
    }
}

/// Parse a netlist description into the immutable model.
pub fn parse(input: &str) -> Result<Netlist, ParseError> {
    let entries = parser::NetlistParser::new().parse(input)?;

    let mut builder = NetlistBuilder::new();
    for Entry { kind, name, pins } in entries.into_iter() {
        let node = match kind {
            EntryKind::Macro => builder.add_macro(name)?,
            EntryKind::Cell => builder.add_cell(name)?,
            EntryKind::Terminal => builder.add_terminal(name)?,
        };
        for pin in pins.into_iter() {
            builder.add_pin(node, pin.name, pin.direction, pin.net);
        }
    }
    Ok(builder.finish())
}

/// Check the cross-reference invariants the search relies on.
///
/// A netlist produced by [`NetlistBuilder`] satisfies these by
/// construction; the check exists so a malformed snapshot fails loudly
/// before the search can turn it into silently wrong flow numbers. The
/// rules are:
/// 1. Every pin is listed by its owning node and by its owning net.
/// 2. Every pin id a node or net lists resolves back to that owner.
/// 3. Macro ids are in range, distinct, and never terminals.
pub fn validate_netlist(netlist: &Netlist) -> Result<()> {
    for (i, pin) in netlist.pins.iter().enumerate() {
        let id = PinId(i);
        let node = netlist
            .nodes
            .get(pin.node.0)
            .ok_or_else(|| anyhow!("pin \"{}\" names a node out of range", pin.name))?;
        if !node.pins.contains(&id) {
            bail!(
                "pin \"{}\" claims node \"{}\" which does not list it",
                pin.name,
                node.name
            );
        }
        let net = netlist
            .nets
            .get(pin.net.0)
            .ok_or_else(|| anyhow!("pin \"{}\" names a net out of range", pin.name))?;
        if !net.pins.contains(&id) {
            bail!(
                "pin \"{}\" claims net \"{}\" which does not list it",
                pin.name,
                net.name
            );
        }
    }

    for (i, node) in netlist.nodes.iter().enumerate() {
        for pin_id in node.pins.iter() {
            let pin = netlist
                .pins
                .get(pin_id.0)
                .ok_or_else(|| anyhow!("node \"{}\" lists a pin out of range", node.name))?;
            if pin.node != NodeId(i) {
                bail!(
                    "node \"{}\" lists pin \"{}\" owned by another node",
                    node.name,
                    pin.name
                );
            }
        }
    }

    for (i, net) in netlist.nets.iter().enumerate() {
        for pin_id in net.pins.iter() {
            let pin = netlist
                .pins
                .get(pin_id.0)
                .ok_or_else(|| anyhow!("net \"{}\" lists a pin out of range", net.name))?;
            if pin.net != NetId(i) {
                bail!(
                    "net \"{}\" lists pin \"{}\" wired to another net",
                    net.name,
                    pin.name
                );
            }
        }
    }

    let mut seen = HashSet::new();
    for macro_id in netlist.macros.iter() {
        if macro_id.0 >= netlist.nodes.len() {
            bail!("macro id {} out of range", macro_id.0);
        }
        if !seen.insert(*macro_id) {
            bail!(
                "node \"{}\" appears twice in the macro list",
                netlist.node(*macro_id).name
            );
        }
        if netlist.is_terminal(*macro_id) {
            bail!(
                "node \"{}\" is both a macro and a terminal",
                netlist.node(*macro_id).name
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let input = r#"
            macro "m0" [out "q" -> "n1"]
            cell "u1" [in "a" <- "n1", out "y" -> "n2"]
            macro "m1" [in "d" <- "n2"]
            terminal "p0" [in "pad" <- "n2"]
            "#;
        let result = parse(input);
        assert!(matches!(result, Ok(_)));

        let netlist = result.unwrap();
        assert_eq!(netlist.node_count(), 4);
        assert_eq!(netlist.pin_count(), 5);
        assert_eq!(netlist.net_count(), 2);
        assert_eq!(netlist.macros().len(), 2);

        // Macro indices follow file order.
        let m0 = netlist.node_named("m0").unwrap();
        let m1 = netlist.node_named("m1").unwrap();
        assert_eq!(netlist.macros(), &[m0, m1]);

        let p0 = netlist.node_named("p0").unwrap();
        assert!(netlist.is_terminal(p0));
        assert!(!netlist.is_terminal(m0));
    }

    #[test]
    fn parse_wires_pins_both_ways() {
        let input = r#"
            macro "m0" [out "q" -> "shared"]
            cell "u1" [in "a" <- "shared"]
            cell "u2" [in "a" <- "shared"]
            "#;
        let netlist = parse(input).unwrap();
        assert_eq!(netlist.net_count(), 1);

        let net = netlist.net(NetId(0));
        assert_eq!(net.pins.len(), 3);
        for pin_id in net.pins.iter() {
            let pin = netlist.pin(*pin_id);
            assert_eq!(pin.net, NetId(0));
            assert!(netlist.node(pin.node).pins.contains(pin_id));
        }
    }

    #[test]
    fn parse_skips_comments() {
        let input = r#"
            # two blocks wired back to back
            macro "a" [out "q" -> "n"]
            macro "b" [in "d" <- "n"] # trailing note
            "#;
        let netlist = parse(input).unwrap();
        assert_eq!(netlist.node_count(), 2);
        assert_eq!(netlist.macros().len(), 2);
    }

    #[test]
    fn parse_err_duplicate() {
        let input = r#"
            cell "u1" [out "y" -> "n1"]
            cell "u1" [in "a" <- "n1"]
            "#;
        let result = parse(input);
        assert!(matches!(result, Err(ParseError::DuplicateNode(_))));
        if let Err(ParseError::DuplicateNode(name)) = result {
            assert_eq!(name.as_ref(), "u1");
        }
    }

    #[test]
    fn parse_err_syntax() {
        let input = r#"
            cell "u1" [out "y" "n1"]
            "#;
        let result = parse(input);
        assert!(matches!(result, Err(ParseError::SyntaxError(_))));
    }

    #[test]
    fn parse_empty_input() {
        let netlist = parse("").unwrap();
        assert_eq!(netlist.node_count(), 0);
        assert!(netlist.macros().is_empty());
    }

    #[test]
    fn validate_accepts_built_netlist() {
        let input = r#"
            macro "m0" [out "q" -> "n1"]
            cell "u1" [in "a" <- "n1", out "y" -> "n2"]
            macro "m1" [in "d" <- "n2"]
            "#;
        let netlist = parse(input).unwrap();
        assert!(validate_netlist(&netlist).is_ok());
    }

    #[test]
    fn builder_direct_use() {
        let mut builder = NetlistBuilder::new();
        let m = builder.add_macro(Symbol::from("ram")).unwrap();
        let c = builder.add_cell(Symbol::from("inv")).unwrap();
        builder.add_pin(m, Symbol::from("q"), PinDirection::Output, Symbol::from("w"));
        builder.add_pin(c, Symbol::from("a"), PinDirection::Input, Symbol::from("w"));
        let netlist = builder.finish();

        assert_eq!(netlist.macros(), &[m]);
        assert_eq!(netlist.net(NetId(0)).pins.len(), 2);
        assert_eq!(netlist.pin(PinId(1)).direction, PinDirection::Input);
        assert!(validate_netlist(&netlist).is_ok());
    }
}
