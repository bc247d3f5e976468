//! Trivial simplifications: dead gates removal ([`Aig::sweep`]) and
//! constant propagation / identity collapsing ([`Aig::optimize`]).

use crate::{AigEdge, GateId, GateKind};

use super::Aig;

impl Aig {
    /// Removes gate `id` regardless of its fanouts, detaching both edge directions.
    fn detach(&mut self, id: GateId) {
        let Some(gate) = self.gates[id].take() else {
            return;
        };
        for fanin in &gate.fanins {
            if let Some(driver) = self.gates[fanin.id].as_mut() {
                driver.remove_fanout(AigEdge::new(id, fanin.complement));
            }
        }
        for fanout in &gate.fanouts {
            if let Some(reader) = self.gates[fanout.id].as_mut() {
                reader.remove_fanin(AigEdge::new(id, fanout.complement));
            }
        }
    }

    /// Removes every and gate and undefined gate which is not reachable from an output,
    /// according to the last evaluation order.
    ///
    /// Inputs, outputs and the constant are never removed.
    /// The evaluation order itself is unchanged, floating and unused gates lists are recomputed.
    /// Returns the number of removed gates.
    pub fn sweep(&mut self) -> usize {
        let mut removed = 0;

        // And gates first: once they are gone, unreachable undefined gates have no fanout left
        for id in 0..self.gates.len() {
            let sweep = match &self.gates[id] {
                Some(g) => g.is_and() && !self.in_last_traversal(id),
                None => false,
            };
            if sweep {
                log::info!("Sweeping: AIG({}) removed...", id);
                self.detach(id);
                removed += 1;
            }
        }
        for id in 0..self.gates.len() {
            let sweep = match &self.gates[id] {
                Some(g) => g.is_undef() && !self.in_last_traversal(id),
                None => false,
            };
            if sweep {
                log::info!("Sweeping: UNDEF({}) removed...", id);
                self.excise(id);
                removed += 1;
            }
        }

        self.find_floating_and_unused();
        debug_assert!(self.check_integrity().is_ok());
        removed
    }

    /// Returns the gate (and polarity) an and gate can be replaced by, if any:
    /// - `0 & x` is `0`
    /// - `1 & x` is `x`
    /// - `x & x` is `x`
    /// - `x & !x` is `0`
    fn trivial_replacement(&self, id: GateId) -> Option<AigEdge> {
        let gate = self.gate(id);
        let (f0, f1) = match (&gate.kind, gate.fanin(0), gate.fanin(1)) {
            (GateKind::And, Some(f0), Some(f1)) => (f0, f1),
            _ => return None,
        };
        if f0.is_cst_false() || f1.is_cst_false() {
            return Some(AigEdge::new(0, false));
        }
        if f0.is_cst_true() {
            return Some(f1);
        }
        if f1.is_cst_true() {
            return Some(f0);
        }
        if f0 == f1 {
            return Some(f0);
        }
        if f0.is_complement_of(&f1) {
            return Some(AigEdge::new(0, false));
        }
        None
    }

    /// Simplifies and gates with a constant fanin or twice the same fanin,
    /// by merging them into the gate they are equivalent to.
    ///
    /// Gates are processed in evaluation order, so simplifications cascade
    /// from the inputs to the outputs in a single scan.
    /// Afterwards the evaluation order and the floating/unused lists are recomputed.
    /// Returns the number of merged gates.
    pub fn optimize(&mut self) -> usize {
        let order = self.dfs_list.clone();
        let mut merged = 0;

        for id in order {
            if self.get_gate(id).is_none() {
                continue;
            }
            if let Some(new) = self.trivial_replacement(id) {
                self.replace(id, new.id, new.complement, "Simplifying");
                merged += 1;
            }
        }

        self.dfs_traversal();
        self.find_floating_and_unused();
        debug_assert!(self.check_integrity().is_ok());
        merged
    }
}

#[cfg(test)]
mod test {
    use crate::aig::test::tables;
    use crate::{Aig, AigEdge};

    use test_log::test;

    #[test]
    fn same_fanin_is_replaced() {
        // 3 = 2 & 2 drives the output
        let mut aig = Aig::from_tables(tables(3, &[2, 4], &[6], &[[6, 4, 4]])).unwrap();
        assert_eq!(aig.optimize(), 1);
        assert!(aig.get_gate(3).is_none());
        assert_eq!(aig.get_gate(4).unwrap().get_fanins(), &[AigEdge::new(2, false)]);
        assert_eq!(aig.dfs_list(), &[2, 4]);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn constant_rules() {
        // 3 = 0 & 1, 4 = !0 & !2, 5 = 1 & !1, 6 = 2 & !0
        let mut aig = Aig::from_tables(tables(
            6,
            &[2, 4],
            &[6, 9, 10, 12],
            &[[6, 0, 2], [8, 1, 5], [10, 2, 3], [12, 4, 1]],
        ))
        .unwrap();
        assert_eq!(aig.optimize(), 4);
        assert_eq!(aig.num_ands(), 0);
        let fanin = |po| aig.get_gate(po).unwrap().fanin(0).unwrap();
        assert_eq!(fanin(7), AigEdge::new(0, false));
        // !(!0 & !2) is 2
        assert_eq!(fanin(8), AigEdge::new(2, false));
        assert_eq!(fanin(9), AigEdge::new(0, false));
        assert_eq!(fanin(10), AigEdge::new(2, false));
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn cascade_and_idempotence() {
        // 3 = 1 & 1, 4 = 3 & !1 (becomes 1 & !1 = 0), 5 = 4 & 2 (becomes 0)
        let mut aig = Aig::from_tables(tables(
            5,
            &[2, 4],
            &[10],
            &[[6, 2, 2], [8, 6, 3], [10, 8, 4]],
        ))
        .unwrap();
        assert_eq!(aig.optimize(), 3);
        assert_eq!(aig.get_gate(6).unwrap().fanin(0), Some(AigEdge::new(0, false)));
        assert_eq!(aig.dfs_list(), &[0, 6]);
        // Inputs are now unused
        assert_eq!(aig.unused_gates(), &[1, 2]);

        let before = aig.clone();
        assert_eq!(aig.optimize(), 0);
        assert_eq!(aig, before);
    }

    #[test]
    fn sweep_unreachable() {
        // 3 = 1 & 2 is used, 4 = 3 & 5 with 5 undefined is not, nor 6 = 4 & 1
        let mut aig = Aig::from_tables(tables(
            6,
            &[2, 4],
            &[6],
            &[[6, 2, 4], [8, 6, 10], [12, 8, 2]],
        ))
        .unwrap();
        assert_eq!(aig.unused_gates(), &[6]);
        assert_eq!(aig.sweep(), 3);
        assert!(aig.get_gate(4).is_none());
        assert!(aig.get_gate(5).is_none());
        assert!(aig.get_gate(6).is_none());
        assert!(aig.get_gate(3).is_some());
        assert_eq!(aig.get_gate(3).unwrap().get_fanouts(), &[AigEdge::new(7, false)]);
        assert!(aig.unused_gates().is_empty());
        assert!(aig.floating_gates().is_empty());
        assert_eq!(aig.dfs_list(), &[1, 2, 3, 7]);
        assert!(aig.check_integrity().is_ok());

        // Nothing more to do
        assert_eq!(aig.sweep(), 0);
    }

    #[test]
    fn sweep_keeps_reachable_undef() {
        let mut aig = Aig::from_tables(tables(3, &[2], &[6], &[[6, 2, 4]])).unwrap();
        assert_eq!(aig.sweep(), 0);
        assert!(aig.get_gate(2).unwrap().is_undef());
        assert_eq!(aig.floating_gates(), &[3]);
    }
}
