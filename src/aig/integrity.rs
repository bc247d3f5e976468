use crate::{Aig, AigError, Gate, GateId, GateKind, Result};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG at any moment.
    ///
    /// It checks that:
    /// - each gate sits in the slot of its own id, and kinds match the slot layout,
    /// - every edge points to a live gate,
    /// - fanin and fanout lists mirror each other (as multisets),
    /// - and gates have 2 fanins, outputs 1, others none,
    /// - the evaluation order only holds live gates, each one after its fanins.
    pub fn check_integrity(&self) -> Result<()> {
        for (id, slot) in self.gates.iter().enumerate() {
            if let Some(gate) = slot {
                if gate.id != id {
                    return Err(AigError::InvalidState(format!(
                        "gate {} stored in slot {}",
                        gate.id, id
                    )));
                }
                self.check_gate_integrity(gate)?;
            }
        }

        // Every (driver, reader, polarity) triple must be seen from both ends
        let mut from_fanins: Vec<(GateId, GateId, bool)> = Vec::new();
        let mut from_fanouts: Vec<(GateId, GateId, bool)> = Vec::new();
        for gate in self.gates() {
            for e in &gate.fanins {
                from_fanins.push((e.id, gate.id, e.complement));
            }
            for e in &gate.fanouts {
                from_fanouts.push((gate.id, e.id, e.complement));
            }
        }
        from_fanins.sort_unstable();
        from_fanouts.sort_unstable();
        if from_fanins != from_fanouts {
            return Err(AigError::InvalidState(
                "fanin and fanout edges do not mirror each other".to_string(),
            ));
        }

        for &id in self.inputs.iter().chain(&self.outputs) {
            self.get_gate(id).ok_or(AigError::GateDoesNotExist(id))?;
        }

        self.check_dfs_order()
    }

    fn check_gate_integrity(&self, gate: &Gate) -> Result<()> {
        let id = gate.id;
        let expected_fanins = match (&gate.kind, id) {
            (GateKind::Const, 0) => 0,
            (GateKind::Input { .. } | GateKind::Undef, id) if 1 <= id && id <= self.max => 0,
            (GateKind::And, id) if 1 <= id && id <= self.max => 2,
            (GateKind::Output { .. }, id) if id > self.max => 1,
            _ => {
                return Err(AigError::InvalidState(format!(
                    "{} gate cannot have id {} (max = {})",
                    gate.type_str(),
                    id,
                    self.max
                )));
            }
        };
        if gate.fanins.len() != expected_fanins {
            return Err(AigError::InvalidState(format!(
                "{} gate {} has {} fanin(s), expected {}",
                gate.type_str(),
                id,
                gate.fanins.len(),
                expected_fanins
            )));
        }
        if gate.is_output() && !gate.fanouts.is_empty() {
            return Err(AigError::InvalidState(format!("output {} has fanouts", id)));
        }

        for e in gate.fanins.iter().chain(&gate.fanouts) {
            if self.get_gate(e.id).is_none() {
                return Err(AigError::InvalidState(format!(
                    "gate {} has an edge pointing at gate {} which is not in the AIG anymore",
                    id, e.id
                )));
            }
        }
        Ok(())
    }

    fn check_dfs_order(&self) -> Result<()> {
        let mut position = vec![None; self.gates.len()];
        for (i, &id) in self.dfs_list.iter().enumerate() {
            if self.get_gate(id).is_none() {
                return Err(AigError::InvalidState(format!(
                    "gate {} of the evaluation order is not in the AIG anymore",
                    id
                )));
            }
            position[id] = Some(i);
        }
        for (i, &id) in self.dfs_list.iter().enumerate() {
            for fanin in &self.gate(id).fanins {
                let ok = match position[fanin.id] {
                    Some(j) => j < i,
                    None => self.gate(fanin.id).is_undef(),
                };
                if !ok {
                    return Err(AigError::InvalidState(format!(
                        "gate {} is evaluated before its fanin {}",
                        id, fanin.id
                    )));
                }
            }
        }
        Ok(())
    }
}
