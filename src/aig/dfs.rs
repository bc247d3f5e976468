//! Epoch-stamped depth-first traversal.
//!
//! Every gate carries a visit stamp and the [`Aig`] owns a global epoch counter.
//! A gate is visited in the current pass iff its stamp equals the current epoch,
//! so starting a new pass is a single increment instead of a reset of every gate.
//!
//! The walk itself yields gates in post-order (fanins before the gates consuming them),
//! which is the evaluation order used by the optimizer, the simulator and the writer.

use crate::{Aig, GateId, GateKind};

impl Aig {
    /// Starts a new pass: every gate becomes unvisited.
    pub(crate) fn new_epoch(&mut self) -> u32 {
        self.global_ref = self.global_ref.wrapping_add(1);
        if self.global_ref == 0 {
            // Wrapped around: stale stamps could collide with new epochs, so every stamp is
            // reset, except that gates of the last traversal keep epoch 1 as their mark
            let reached = self.dfs_ref;
            for gate in self.gates.iter_mut().flatten() {
                gate.stamp = 0;
                gate.dfs_stamp = u32::from(reached != 0 && gate.dfs_stamp == reached);
            }
            self.dfs_ref = u32::from(reached != 0);
            self.global_ref = 2;
        }
        self.global_ref
    }

    pub(crate) fn is_visited(&self, id: GateId) -> bool {
        self.gate(id).stamp == self.global_ref
    }

    pub(crate) fn mark_visited(&mut self, id: GateId) {
        let epoch = self.global_ref;
        self.gate_mut(id).stamp = epoch;
    }

    /// Returns true if the gate was reached by the last [`Aig::dfs_traversal`].
    pub(crate) fn in_last_traversal(&self, id: GateId) -> bool {
        self.dfs_ref != 0 && self.gate(id).dfs_stamp == self.dfs_ref
    }

    /// Post-order walk of the fanin cone of `root`, skipping gates already visited in this epoch.
    ///
    /// Undefined gates are marked but neither expanded nor appended to `order`.
    /// If `full` is set, reached gates are also recorded as part of the evaluation order.
    fn dfs_visit(&mut self, root: GateId, order: &mut Vec<GateId>, full: bool) {
        let epoch = self.global_ref;
        let mut stack: Vec<(GateId, bool)> = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            // Post order
            if expanded {
                order.push(id);
                continue;
            }
            if self.is_visited(id) {
                continue;
            }

            let gate = self.gate_mut(id);
            gate.stamp = epoch;
            if full {
                gate.dfs_stamp = epoch;
            }

            match gate.kind {
                GateKind::Undef => (),
                GateKind::Const | GateKind::Input { .. } => order.push(id),
                GateKind::And | GateKind::Output { .. } => {
                    stack.push((id, true));
                    // Reversed so that fanin0 is walked first
                    for i in (0..gate.fanins.len()).rev() {
                        let fanin = gate.fanins[i].id;
                        stack.push((fanin, false));
                    }
                }
            }
        }
    }

    /// Recomputes the evaluation order: every gate reachable from an output
    /// (outputs included, undefined gates excluded), each gate after its fanins.
    pub fn dfs_traversal(&mut self) {
        let epoch = self.new_epoch();
        self.dfs_ref = epoch;

        let mut order = Vec::with_capacity(self.dfs_list.len());
        for i in 0..self.outputs.len() {
            let po = self.outputs[i];
            self.dfs_visit(po, &mut order, true);
        }
        log::debug!("dfs traversal: {} gates", order.len());
        self.dfs_list = order;
    }

    /// Returns the evaluation order of the fanin cone of a single gate
    /// (the gate included), or [`None`] if the gate does not exist.
    ///
    /// The evaluation order of the whole circuit is left untouched.
    pub fn cone(&mut self, id: GateId) -> Option<Vec<GateId>> {
        self.get_gate(id)?;
        self.new_epoch();
        let mut order = Vec::new();
        self.dfs_visit(id, &mut order, false);
        Some(order)
    }
}
