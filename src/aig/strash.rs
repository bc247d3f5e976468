//! Structural hashing: and gates computing the same function of the same fanins are merged.

use crate::{
    GateId,
    hash::{BucketMap, FaninKey},
};

use super::Aig;

impl Aig {
    /// Merges structurally equivalent and gates, ie and gates with the same (unordered) pair
    /// of fanins, into the first one met in evaluation order.
    ///
    /// Since fanins are evaluated before the gates reading them, a merge may reveal new
    /// duplicates further down the order, which are caught in the same scan.
    /// Returns the number of merged gates.
    pub fn strash(&mut self) -> usize {
        let order = self.dfs_list.clone();
        let mut table: BucketMap<FaninKey, GateId> = BucketMap::new(order.len());
        let mut merged = 0;

        for id in order {
            let key = match self.get_gate(id) {
                Some(gate) if gate.is_and() => match (gate.fanin(0), gate.fanin(1)) {
                    (Some(f0), Some(f1)) => FaninKey::new(f0, f1),
                    _ => continue,
                },
                _ => continue,
            };
            let (&mut existing, found) = table.query_or_insert(key, id);
            if found {
                self.replace(id, existing, false, "Strashing");
                merged += 1;
            }
        }

        self.dfs_traversal();
        self.find_floating_and_unused();
        debug_assert!(self.check_integrity().is_ok());
        merged
    }
}
