pub use crate::netlist::{PinDirection, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Macro,
    Cell,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinEntry {
    pub name: Symbol,
    pub direction: PinDirection,
    pub net: Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub name: Symbol,
    pub pins: Vec<PinEntry>,
}

impl Entry {
    pub fn new(kind: EntryKind, name: Symbol, pins: Vec<PinEntry>) -> Entry {
        Entry { kind, name, pins }
    }
}
