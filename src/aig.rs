//! Module defining the [`Aig`] struct, as well as [`Gate`], [`AigEdge`] and some others relevant structs.
//!
//! To reduce a circuit, check [`Aig::sweep`], [`Aig::optimize`] and [`Aig::strash`].
//! To look for functionally equivalent gates, check [`crate::sim`] and [`crate::fraig`].

pub mod dfs;
pub mod edge;
pub mod error;
pub mod gate;
mod integrity;
pub mod opt;
mod parser;
pub mod rewrite;
pub mod strash;
mod writer;

pub use edge::{AigEdge, Literal};
pub use error::{AigError, ParserError, Result, SimError};
pub use gate::{Gate, GateId, GateKind};

/// Flat description of a circuit, as read from an ASCII AIGER file.
///
/// Every entry carries the (1-based) line it was defined on.
/// Symbol entries use the position of the input/output in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitTables {
    /// Highest input/and gate id.
    pub max: GateId,
    /// Input literals.
    pub inputs: Vec<(Literal, usize)>,
    /// Output literals, ie the signal driving each output.
    pub outputs: Vec<(Literal, usize)>,
    /// And gates as `[lhs, rhs0, rhs1]` literals.
    pub ands: Vec<([Literal; 3], usize)>,
    pub input_names: Vec<(usize, String, usize)>,
    pub output_names: Vec<(usize, String, usize)>,
}

/// A whole AIG.
///
/// Gates live in a dense slot array indexed by their id, of size `max + outputs + 1`:
/// - slot 0 is the constant,
/// - slots `1..=max` are inputs, and gates and undefined placeholders (or empty),
/// - slots `max + 1..=max + outputs` are the primary outputs.
///
/// A slot becomes empty once its gate is removed by [`Aig::excise`] or [`Aig::sweep`].
/// Edges are plain ids, so every dereference goes through the slot array.
///
/// The other lists (evaluation order, floating and unused gates) can be derived from the
/// slots and are recomputed after each structural change.
#[derive(Debug, Clone)]
pub struct Aig {
    pub(crate) gates: Vec<Option<Gate>>,
    pub(crate) max: GateId,
    pub(crate) inputs: Vec<GateId>,
    pub(crate) outputs: Vec<GateId>,
    /// Evaluation order: every gate reachable from an output, fanins first.
    pub(crate) dfs_list: Vec<GateId>,
    /// Gates with at least one undefined fanin.
    pub(crate) floating: Vec<GateId>,
    /// Gates (not outputs) without any fanout.
    pub(crate) unused: Vec<GateId>,
    pub(crate) fec_groups: Vec<Vec<GateId>>,
    /// Global epoch, see [`Aig::new_epoch`].
    pub(crate) global_ref: u32,
    /// Epoch of the last full traversal from the outputs.
    pub(crate) dfs_ref: u32,
}

impl Aig {
    fn empty(max: GateId, n_outputs: usize) -> Self {
        let mut gates = Vec::new();
        gates.resize_with(max + n_outputs + 1, || None);
        gates[0] = Some(Gate::new(0, GateKind::Const, 0));
        Aig {
            gates,
            max,
            inputs: Vec::new(),
            outputs: Vec::new(),
            dfs_list: Vec::new(),
            floating: Vec::new(),
            unused: Vec::new(),
            fec_groups: Vec::new(),
            global_ref: 0,
            dfs_ref: 0,
        }
    }

    fn check_literal(&self, literal: Literal, line: usize) -> Result<AigEdge> {
        let edge = AigEdge::from_literal(literal);
        if edge.id > self.max {
            return Err(ParserError::LiteralOutOfRange {
                line,
                literal,
                max: self.max,
            }
            .into());
        }
        Ok(edge)
    }

    fn define(&mut self, id: GateId, kind: GateKind, line: usize) -> Result<()> {
        if let Some(previous) = &self.gates[id] {
            return Err(ParserError::Redefinition {
                line,
                literal: 2 * id,
                previous: previous.line_no,
            }
            .into());
        }
        self.gates[id] = Some(Gate::new(id, kind, line));
        Ok(())
    }

    /// Adds `fanin` to gate `to`, and the mirroring fanout.
    /// A referenced but undefined gate is created on the fly.
    fn connect(&mut self, to: GateId, fanin: AigEdge) {
        let driver = self.gates[fanin.id].get_or_insert_with(|| {
            log::debug!("gate {} referenced by {} is undefined", fanin.id, to);
            Gate::new(fanin.id, GateKind::Undef, 0)
        });
        driver.add_fanout(AigEdge::new(to, fanin.complement));
        self.gate_mut(to).add_fanin(fanin);
    }

    /// Builds the AIG from parsed tables.
    ///
    /// This fails if a literal is out of range, an input or and gate is defined
    /// on an inverted literal (or on the constant), a gate is defined twice,
    /// or a symbol record is invalid. On error no AIG is returned.
    pub fn from_tables(tables: CircuitTables) -> Result<Self> {
        let mut aig = Aig::empty(tables.max, tables.outputs.len());

        // Inputs first
        for &(literal, line) in &tables.inputs {
            let edge = aig.check_literal(literal, line)?;
            if edge.complement || edge.id == 0 {
                return Err(ParserError::CannotInvert {
                    line,
                    what: "PI",
                    literal,
                }
                .into());
            }
            aig.define(edge.id, GateKind::Input { name: None }, line)?;
            aig.inputs.push(edge.id);
        }

        // Outputs take the slots right above max
        for (i, &(_, line)) in tables.outputs.iter().enumerate() {
            let id = tables.max + 1 + i;
            aig.define(id, GateKind::Output { name: None }, line)?;
            aig.outputs.push(id);
        }

        // And gates must all be defined before being connected
        for &([lhs, _, _], line) in &tables.ands {
            let edge = aig.check_literal(lhs, line)?;
            if edge.complement || edge.id == 0 {
                return Err(ParserError::CannotInvert {
                    line,
                    what: "AIG",
                    literal: lhs,
                }
                .into());
            }
            aig.define(edge.id, GateKind::And, line)?;
        }

        // Then connecting everything
        for (i, &(literal, line)) in tables.outputs.iter().enumerate() {
            let fanin = aig.check_literal(literal, line)?;
            aig.connect(tables.max + 1 + i, fanin);
        }
        for &([lhs, rhs0, rhs1], line) in &tables.ands {
            let fanin0 = aig.check_literal(rhs0, line)?;
            let fanin1 = aig.check_literal(rhs1, line)?;
            aig.connect(lhs >> 1, fanin0);
            aig.connect(lhs >> 1, fanin1);
        }

        // Symbols
        for (idx, name, line) in tables.input_names {
            let id = *aig.inputs.get(idx).ok_or(ParserError::InvalidSymbol {
                line,
                msg: format!("input index {} is too big ({} inputs)", idx, aig.inputs.len()),
            })?;
            aig.set_symbol(id, name, line)?;
        }
        for (idx, name, line) in tables.output_names {
            let id = *aig.outputs.get(idx).ok_or(ParserError::InvalidSymbol {
                line,
                msg: format!("output index {} is too big ({} outputs)", idx, aig.outputs.len()),
            })?;
            aig.set_symbol(id, name, line)?;
        }

        for gate in aig.gates.iter_mut().flatten() {
            gate.sort_fanouts();
        }

        aig.dfs_traversal();
        aig.find_floating_and_unused();
        log::debug!(
            "built AIG: {} inputs, {} outputs, {} and gates",
            aig.inputs.len(),
            aig.outputs.len(),
            aig.num_ands()
        );
        Ok(aig)
    }

    fn set_symbol(&mut self, id: GateId, name: String, line: usize) -> Result<()> {
        let gate = self.gate_mut(id);
        if let Some(old) = gate.get_name() {
            return Err(ParserError::InvalidSymbol {
                line,
                msg: format!("symbolic name for gate {} is redefined (was {})", id, old),
            }
            .into());
        }
        gate.set_name(name);
        Ok(())
    }

    /// Retrieves a gate from its id, [`None`] if the id is out of range or the gate was removed.
    pub fn get_gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id)?.as_ref()
    }

    /// Live gate lookup for ids that are known to be valid (read from an edge or a list).
    pub(crate) fn gate(&self, id: GateId) -> &Gate {
        match &self.gates[id] {
            Some(g) => g,
            None => panic!("dangling reference to removed gate {}", id),
        }
    }

    pub(crate) fn gate_mut(&mut self, id: GateId) -> &mut Gate {
        match &mut self.gates[id] {
            Some(g) => g,
            None => panic!("dangling reference to removed gate {}", id),
        }
    }

    /// Iterates over live gates, by increasing id.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter().flatten()
    }

    /// Highest input/and gate id, as given by the header.
    pub fn get_max(&self) -> GateId {
        self.max
    }

    /// Retrieves inputs id, in declaration order.
    pub fn get_inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Retrieves outputs id, in declaration order.
    pub fn get_outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Evaluation order computed by the last [`Aig::dfs_traversal`].
    pub fn dfs_list(&self) -> &[GateId] {
        &self.dfs_list
    }

    /// Gates with at least one fanin to an undefined gate.
    pub fn floating_gates(&self) -> &[GateId] {
        &self.floating
    }

    /// Inputs and and gates which drive nothing.
    pub fn unused_gates(&self) -> &[GateId] {
        &self.unused
    }

    pub fn num_ands(&self) -> usize {
        self.gates().filter(|g| g.is_and()).count()
    }

    /// Recomputes the floating and unused gates lists from the current slots.
    pub(crate) fn find_floating_and_unused(&mut self) {
        self.floating.clear();
        self.unused.clear();
        for gate in self.gates.iter().flatten() {
            if (gate.is_input() || gate.is_and()) && gate.fanout_num() == 0 {
                self.unused.push(gate.id);
            }
            if (gate.is_and() || gate.is_output())
                && gate.fanins.iter().any(|e| self.gate(e.id).is_undef())
            {
                self.floating.push(gate.id);
            }
        }
    }
}

impl PartialEq for Aig {
    /// Compares the two AIGs. They are equal iff their inputs, outputs and live gates are equal.
    /// Simulation data is not taken into account.
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs && self.outputs == other.outputs && self.gates == other.gates
    }
}
