use std::fmt;

use super::AigEdge;

/// A gate id.
///
/// The constant gate [`GateKind::Const`] has id 0 by convention. Ids index the
/// slot array of the owning [`Aig`] and are unique among live gates.
///
/// [`Aig`]: super::Aig
pub type GateId = usize;

/// The variant of a gate. A gate never changes variant once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateKind {
    /// The constant low/false signal.
    Const,
    /// A primary input.
    Input { name: Option<String> },
    /// A primary output, driven by exactly one fanin.
    Output { name: Option<String> },
    /// An AND gate with two positional fanins.
    And,
    /// Stands in for a literal which is referenced but never defined.
    Undef,
}

/// A gate of the AIG.
///
/// Internal note: gates carry their fanouts with them. Every fanin edge `(b, p)`
/// of gate `a` must be mirrored by a fanout edge `(a, p)` on gate `b`.
/// The edit methods below only touch one side, the owning [`Aig`] keeps both in sync.
///
/// [`Aig`]: super::Aig
#[derive(Debug, Clone)]
pub struct Gate {
    pub(crate) id: GateId,
    pub(crate) line_no: usize,
    pub(crate) kind: GateKind,
    pub(crate) fanins: Vec<AigEdge>,
    pub(crate) fanouts: Vec<AigEdge>,
    /// Simulation value, one bit per parallel pattern.
    pub(crate) value: u64,
    pub(crate) group: Option<usize>,
    /// Last epoch this gate was visited in.
    pub(crate) stamp: u32,
    /// Last full traversal (from the outputs) which reached this gate.
    pub(super) dfs_stamp: u32,
}

impl PartialEq for Gate {
    /// Structural equality: simulation data and stamps are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.fanins == other.fanins
            && self.fanouts == other.fanouts
    }
}

impl Eq for Gate {}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GateKind::Const => return write!(f, "CONST0"),
            _ => write!(f, "{:<3} {}", self.type_str(), self.id)?,
        }
        for fanin in &self.fanins {
            write!(f, " {}", fanin)?;
        }
        if let Some(name) = self.get_name() {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

impl Gate {
    pub(super) fn new(id: GateId, kind: GateKind, line_no: usize) -> Self {
        Gate {
            id,
            line_no,
            kind,
            fanins: Vec::new(),
            fanouts: Vec::new(),
            value: 0,
            group: None,
            stamp: 0,
            dfs_stamp: 0,
        }
    }

    pub fn get_id(&self) -> GateId {
        self.id
    }

    /// Line of the gate definition in the source file, 0 if synthesized.
    pub fn get_line_no(&self) -> usize {
        self.line_no
    }

    pub fn get_kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn type_str(&self) -> &'static str {
        match self.kind {
            GateKind::Const => "CONST",
            GateKind::Input { .. } => "PI",
            GateKind::Output { .. } => "PO",
            GateKind::And => "AIG",
            GateKind::Undef => "UNDEF",
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, GateKind::Const)
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, GateKind::Input { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, GateKind::Output { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self.kind, GateKind::And)
    }

    pub fn is_undef(&self) -> bool {
        matches!(self.kind, GateKind::Undef)
    }

    pub fn get_name(&self) -> Option<&str> {
        match &self.kind {
            GateKind::Input { name } | GateKind::Output { name } => name.as_deref(),
            _ => None,
        }
    }

    /// Sets the symbolic name of an input or output. Other gates have no name.
    pub(super) fn set_name(&mut self, new_name: String) {
        if let GateKind::Input { name } | GateKind::Output { name } = &mut self.kind {
            *name = Some(new_name);
        }
    }

    pub fn get_value(&self) -> u64 {
        self.value
    }

    pub fn get_group(&self) -> Option<usize> {
        self.group
    }

    pub fn get_fanins(&self) -> &[AigEdge] {
        &self.fanins
    }

    pub fn get_fanouts(&self) -> &[AigEdge] {
        &self.fanouts
    }

    pub fn fanin(&self, i: usize) -> Option<AigEdge> {
        self.fanins.get(i).copied()
    }

    pub fn fanout(&self, i: usize) -> Option<AigEdge> {
        self.fanouts.get(i).copied()
    }

    pub fn fanin_num(&self) -> usize {
        self.fanins.len()
    }

    pub fn fanout_num(&self) -> usize {
        self.fanouts.len()
    }

    pub(super) fn add_fanin(&mut self, edge: AigEdge) {
        self.fanins.push(edge);
    }

    pub(super) fn add_fanout(&mut self, edge: AigEdge) {
        self.fanouts.push(edge);
    }

    /// Removes the fanin at position `i`, later fanins shift down.
    pub fn delete_fanin(&mut self, i: usize) -> Option<AigEdge> {
        (i < self.fanins.len()).then(|| self.fanins.remove(i))
    }

    /// Removes the fanout at position `i`, later fanouts shift down.
    pub fn delete_fanout(&mut self, i: usize) -> Option<AigEdge> {
        (i < self.fanouts.len()).then(|| self.fanouts.remove(i))
    }

    /// Removes the first fanin equal to `edge`. Returns false if there was none.
    pub(super) fn remove_fanin(&mut self, edge: AigEdge) -> bool {
        let i = self.fanins.iter().position(|e| *e == edge);
        i.and_then(|i| self.delete_fanin(i)).is_some()
    }

    /// Removes the first fanout equal to `edge`. Returns false if there was none.
    pub(super) fn remove_fanout(&mut self, edge: AigEdge) -> bool {
        let i = self.fanouts.iter().position(|e| *e == edge);
        i.and_then(|i| self.delete_fanout(i)).is_some()
    }

    /// Replaces the first fanin equal to `old` by `new`, keeping its position.
    pub(super) fn change_fanin(&mut self, old: AigEdge, new: AigEdge) -> bool {
        change_edge(&mut self.fanins, old, new)
    }

    /// Replaces the first fanout equal to `old` by `new`, keeping its position.
    pub fn change_fanout(&mut self, old: AigEdge, new: AigEdge) -> bool {
        change_edge(&mut self.fanouts, old, new)
    }

    pub(super) fn sort_fanouts(&mut self) {
        self.fanouts.sort_by_key(|e| e.id);
    }
}

fn change_edge(edges: &mut [AigEdge], old: AigEdge, new: AigEdge) -> bool {
    match edges.iter_mut().find(|e| **e == old) {
        Some(e) => {
            *e = new;
            true
        }
        None => false,
    }
}
