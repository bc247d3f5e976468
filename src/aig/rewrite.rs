//! Primitives rewiring the AIG while keeping fanin and fanout edges mirrored.
//!
//! Every structural transformation ([`Aig::optimize`], [`Aig::strash`], [`Aig::fraig`])
//! boils down to "gate `old` computes the same signal as `new`, possibly inverted":
//! the fanouts of `old` are moved to `new`, then the now useless gate is dropped.
//! Passes batch such replacements and re-traverse once at the end, while [`Aig::merge`]
//! leaves the AIG ready for any other operation.
//!
//! [`Aig::fraig`]: crate::Aig::fraig

use crate::{AigEdge, GateId};

use super::Aig;

impl Aig {
    /// Moves every fanout of `old` to `new`.
    ///
    /// A fanout reading `old` with polarity `p` now reads `new` with polarity `p ^ complement`,
    /// at the same fanin position. `old` is left without any fanout.
    pub(crate) fn redirect(&mut self, old: GateId, new: GateId, complement: bool) {
        assert_ne!(old, new, "cannot redirect gate {} to itself", old);
        let fanouts = std::mem::take(&mut self.gate_mut(old).fanouts);
        for fanout in fanouts {
            let moved = AigEdge::new(new, fanout.complement).xor(complement);
            let changed = self
                .gate_mut(fanout.id)
                .change_fanin(AigEdge::new(old, fanout.complement), moved);
            assert!(
                changed,
                "gate {} is a fanout of {} but does not read it",
                fanout.id, old
            );
            self.gate_mut(new)
                .add_fanout(AigEdge::new(fanout.id, moved.complement));
        }
    }

    /// Removes a gate without fanouts from the AIG.
    ///
    /// The gate is also removed from the fanout lists of its fanins, and its slot becomes empty.
    ///
    /// # Panics
    ///
    /// Panics if the gate still has fanouts or is an output, an input or the constant.
    pub(crate) fn excise(&mut self, id: GateId) {
        let gate = self.gates[id]
            .take()
            .unwrap_or_else(|| panic!("gate {} does not exist", id));
        assert!(
            gate.fanouts.is_empty(),
            "cannot excise gate {} which still has {} fanout(s)",
            id,
            gate.fanouts.len()
        );
        assert!(
            gate.is_and() || gate.is_undef(),
            "cannot excise {} gate {}",
            gate.type_str(),
            id
        );
        for fanin in &gate.fanins {
            let removed = self
                .gate_mut(fanin.id)
                .remove_fanout(AigEdge::new(id, fanin.complement));
            assert!(removed, "fanin {} of gate {} has no fanout to it", fanin.id, id);
        }
    }

    /// Replaces `old` by `new` (inverted if `complement` is set) and drops `old`,
    /// without updating the evaluation order. `pass` prefixes the log line.
    pub(crate) fn replace(&mut self, old: GateId, new: GateId, complement: bool, pass: &str) {
        log::info!(
            "{}: {} merging {}{}...",
            pass,
            new,
            if complement { "!" } else { "" },
            old
        );
        self.redirect(old, new, complement);
        self.excise(old);
    }

    /// Replaces gate `old` by (possibly complemented) gate `new` everywhere, then removes `old`.
    ///
    /// The evaluation order and the floating/unused lists are recomputed, so any other
    /// operation can follow.
    ///
    /// # Panics
    ///
    /// Panics if `old` is not an and or undefined gate, or if `old` and `new` are the same gate.
    /// `new` must not be in the fanout cone of `old`.
    pub fn merge(&mut self, old: GateId, new: GateId, complement: bool) {
        self.replace(old, new, complement, "Merging");
        self.dfs_traversal();
        self.find_floating_and_unused();
        debug_assert!(self.check_integrity().is_ok());
    }
}
