//! Functional reduction: merging gates proven equivalent.
//!
//! Simulation ([`crate::sim`]) only gathers *candidates*: gates which behaved the same
//! (up to inversion) on every simulated pattern. Each candidate pair still has to be proven
//! before merging, which is the job of an [`EquivalenceProver`], typically a SAT solver
//! working on a miter of the two gates.

use crate::{Aig, AigEdge, GateId};

/// Proves (or refutes) that two gates of an AIG are functionally equivalent.
pub trait EquivalenceProver {
    /// Returns true only if gate `member` computes the same function as `repr`
    /// (`repr` carrying the polarity under which they are claimed equal) for every input.
    fn prove(&mut self, aig: &Aig, repr: AigEdge, member: GateId) -> bool;
}

impl<F> EquivalenceProver for F
where
    F: FnMut(&Aig, AigEdge, GateId) -> bool,
{
    fn prove(&mut self, aig: &Aig, repr: AigEdge, member: GateId) -> bool {
        self(aig, repr, member)
    }
}

/// Proves equivalences by simulating every input pattern.
///
/// Only suitable for circuits with few inputs: circuits with more than `max_inputs`
/// inputs are never proven equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveProver {
    pub max_inputs: usize,
}

impl Default for ExhaustiveProver {
    fn default() -> Self {
        ExhaustiveProver { max_inputs: 16 }
    }
}

impl EquivalenceProver for ExhaustiveProver {
    fn prove(&mut self, aig: &Aig, repr: AigEdge, member: GateId) -> bool {
        let n = aig.inputs.len();
        if n > self.max_inputs || n >= u64::BITS as usize {
            log::debug!("{} inputs, too many for an exhaustive proof", n);
            return false;
        }
        let total: u64 = 1 << n;
        // Undefined gates and the constant stay at 0
        let mut values = vec![0u64; aig.gates.len()];

        let mut start = 0;
        while start < total {
            let num = (total - start).min(u64::BITS as u64);
            for (j, &pi) in aig.inputs.iter().enumerate() {
                values[pi] = (0..num)
                    .filter(|k| ((start + k) >> j) & 1 == 1)
                    .fold(0, |w, k| w | (1 << k));
            }
            for &id in &aig.dfs_list {
                let Some(gate) = aig.get_gate(id) else {
                    continue;
                };
                if gate.is_and() || gate.is_output() {
                    values[id] = gate
                        .fanins
                        .iter()
                        .map(|e| if e.complement { !values[e.id] } else { values[e.id] })
                        .fold(u64::MAX, |acc, v| acc & v);
                }
            }

            let mask = if num == u64::BITS as u64 {
                u64::MAX
            } else {
                (1 << num) - 1
            };
            let expected = if repr.complement {
                !values[repr.id]
            } else {
                values[repr.id]
            };
            if (expected ^ values[member]) & mask != 0 {
                return false;
            }
            start += num;
        }
        true
    }
}

impl Aig {
    /// Merges the FEC candidates of the last simulation campaign which `prover` proves
    /// equivalent.
    ///
    /// In each group, the representative is the member coming first in evaluation order
    /// (so the constant whenever it belongs to the group), and every other member is merged
    /// into it if proven equivalent. The polarity of each claim is given by the last
    /// simulated values. Gate values must thus be those of the last round of the campaign,
    /// and no structural change must have happened since.
    ///
    /// FEC groups are cleared afterwards. Returns the number of merged gates.
    pub fn fraig<P: EquivalenceProver + ?Sized>(&mut self, prover: &mut P) -> usize {
        let mut position = vec![usize::MAX; self.gates.len()];
        for (i, &id) in self.dfs_list.iter().enumerate() {
            position[id] = i;
        }
        position[0] = 0;

        let groups = std::mem::take(&mut self.fec_groups);
        let mut merged = 0;
        for group in &groups {
            let live: Vec<GateId> = group
                .iter()
                .copied()
                .filter(|&id| self.get_gate(id).is_some())
                .collect();
            let Some(&repr) = live.iter().min_by_key(|&&id| (position[id], id)) else {
                continue;
            };
            let repr_value = self.gate(repr).value;

            for &member in live.iter().filter(|&&id| id != repr) {
                let complement = self.gate(member).value != repr_value;
                let claim = AigEdge::new(repr, complement);
                if prover.prove(self, claim, member) {
                    self.replace(member, repr, complement, "Fraig");
                    merged += 1;
                } else {
                    log::debug!("Fraig: {} and {} are not equivalent", claim, member);
                }
            }
        }

        for gate in self.gates.iter_mut().flatten() {
            gate.group = None;
        }
        self.dfs_traversal();
        self.find_floating_and_unused();
        debug_assert!(self.check_integrity().is_ok());
        merged
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aig::test::tables;
    use crate::sim::SimConfig;

    use test_log::test;

    /// 3 = 1 & 2, 4 = 1 & 3 (same as 3), 5 = 3 & !1 (always 0), 6 = !0 & !0 (always 1).
    fn circuit() -> Aig {
        let mut aig = Aig::from_tables(tables(
            6,
            &[2, 4],
            &[8, 10, 12],
            &[[6, 2, 4], [8, 2, 6], [10, 6, 3], [12, 1, 1]],
        ))
        .unwrap();
        aig.random_sim(&SimConfig::default(), None).unwrap();
        aig
    }

    #[test]
    fn claims_and_polarity() {
        let mut aig = circuit();
        assert_eq!(aig.fec_groups(), &[vec![0, 5, 6], vec![3, 4]]);

        let mut claims = Vec::new();
        let mut refuse = |_: &Aig, repr: AigEdge, member: GateId| {
            claims.push((repr, member));
            false
        };
        assert_eq!(aig.fraig(&mut refuse), 0);
        assert_eq!(
            claims,
            vec![
                (AigEdge::new(0, false), 5),
                (AigEdge::new(0, true), 6),
                (AigEdge::new(3, false), 4)
            ]
        );
        assert!(aig.fec_groups().is_empty());
        assert_eq!(aig.get_gate(3).unwrap().get_group(), None);
        assert_eq!(aig.num_ands(), 4);
    }

    #[test]
    fn exhaustive_merges() {
        let mut aig = circuit();
        assert_eq!(aig.fraig(&mut ExhaustiveProver::default()), 3);
        assert_eq!(aig.num_ands(), 1);
        let fanin = |po| aig.get_gate(po).unwrap().fanin(0).unwrap();
        assert_eq!(fanin(7), AigEdge::new(3, false));
        assert_eq!(fanin(8), AigEdge::new(0, false));
        assert_eq!(fanin(9), AigEdge::new(0, true));
        assert_eq!(aig.dfs_list(), &[1, 2, 3, 7, 0, 8, 9]);
        assert!(aig.check_integrity().is_ok());

        // Groups are gone, nothing more to merge
        assert_eq!(aig.fraig(&mut ExhaustiveProver::default()), 0);
    }

    #[test]
    fn exhaustive_refutes() {
        // 3 = 1 & 2 and 4 = 1 & !2 differ on a single pattern
        let aig = Aig::from_tables(tables(4, &[2, 4], &[6, 8], &[[6, 2, 4], [8, 2, 5]])).unwrap();
        let mut prover = ExhaustiveProver::default();
        assert!(!prover.prove(&aig, AigEdge::new(3, false), 4));
        assert!(prover.prove(&aig, AigEdge::new(3, false), 3));
        assert!(!prover.prove(&aig, AigEdge::new(3, true), 3));

        let mut prover = ExhaustiveProver { max_inputs: 1 };
        assert!(!prover.prove(&aig, AigEdge::new(3, false), 3));
    }
}
