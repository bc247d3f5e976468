//! ASCII AIGER output.

use std::io::Write;

use crate::{Aig, AigEdge, AigError, GateId, Result};

impl Aig {
    fn write_ands(&self, w: &mut impl Write, order: &[GateId]) -> Result<()> {
        for &id in order {
            let gate = self.gate(id);
            if !gate.is_and() {
                continue;
            }
            write!(w, "{}", 2 * id)?;
            for fanin in &gate.fanins {
                write!(w, " {}", fanin.literal())?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_input_symbols(&self, w: &mut impl Write) -> Result<()> {
        for (i, &id) in self.inputs.iter().enumerate() {
            if let Some(name) = self.gate(id).get_name() {
                writeln!(w, "i{} {}", i, name)?;
            }
        }
        Ok(())
    }

    fn count_ands(&self, order: &[GateId]) -> usize {
        order.iter().filter(|&&id| self.gate(id).is_and()).count()
    }

    /// Writes the circuit in ASCII AIGER format.
    ///
    /// Only the and gates of the evaluation order are written, in that order,
    /// so unused gates do not make it to the output. Gates ids are kept as is,
    /// and the header maximum is the one the circuit was read with.
    pub fn write_aag(&self, w: &mut impl Write) -> Result<()> {
        writeln!(
            w,
            "aag {} {} 0 {} {}",
            self.max,
            self.inputs.len(),
            self.outputs.len(),
            self.count_ands(&self.dfs_list)
        )?;
        for &id in &self.inputs {
            writeln!(w, "{}", 2 * id)?;
        }
        for &id in &self.outputs {
            let fanin = self.gate(id).fanin(0).ok_or_else(|| {
                AigError::InvalidState(format!("output {} has no fanin", id))
            })?;
            writeln!(w, "{}", fanin.literal())?;
        }
        self.write_ands(w, &self.dfs_list)?;

        self.write_input_symbols(w)?;
        for (i, &id) in self.outputs.iter().enumerate() {
            if let Some(name) = self.gate(id).get_name() {
                writeln!(w, "o{} {}", i, name)?;
            }
        }
        Ok(())
    }

    /// Writes the fanin cone of gate `id` in ASCII AIGER format.
    ///
    /// Every input of the circuit is kept, the single output is the gate itself,
    /// named after its id. For an output gate, the written output is its fanin.
    pub fn write_gate(&mut self, w: &mut impl Write, id: GateId) -> Result<()> {
        let cone = self.cone(id).ok_or(AigError::GateDoesNotExist(id))?;

        writeln!(
            w,
            "aag {} {} 0 1 {}",
            self.max,
            self.inputs.len(),
            self.count_ands(&cone)
        )?;
        for &pi in &self.inputs {
            writeln!(w, "{}", 2 * pi)?;
        }
        let output = if self.gate(id).is_output() {
            self.gate(id).fanin(0).ok_or_else(|| {
                AigError::InvalidState(format!("output {} has no fanin", id))
            })?
        } else {
            AigEdge::new(id, false)
        };
        writeln!(w, "{}", output.literal())?;
        self.write_ands(w, &cone)?;

        self.write_input_symbols(w)?;
        writeln!(w, "o0 {}", id)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::aig::test::tables;
    use crate::{Aig, AigError};

    use test_log::test;

    fn to_string(aig: &Aig) -> String {
        let mut out = Vec::new();
        aig.write_aag(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn write_simple() {
        let content = "aag 5 2 0 1 1\n2\n4\n10\n10 2 5\ni0 a\no0 out\n";
        let aig = Aig::from_ascii(content.as_bytes()).unwrap();
        assert_eq!(to_string(&aig), content);
    }

    #[test]
    fn unused_gates_are_dropped() {
        // 4 = 1 & 2 drives nothing
        let aig = Aig::from_tables(tables(4, &[2, 4], &[7], &[[6, 2, 5], [8, 2, 4]])).unwrap();
        assert_eq!(to_string(&aig), "aag 4 2 0 1 1\n2\n4\n7\n6 2 5\n");
    }

    #[test]
    fn round_trip() {
        let aig = Aig::from_tables(tables(
            6,
            &[2, 4, 6],
            &[12, 9, 0],
            &[[8, 2, 4], [10, 8, 7], [12, 10, 3]],
        ))
        .unwrap();
        let written = to_string(&aig);
        let reread = Aig::from_ascii(written.as_bytes()).unwrap();
        assert_eq!(aig, reread);
        assert_eq!(to_string(&reread), written);
    }

    #[test]
    fn write_gate_cone() {
        let mut aig = Aig::from_tables(tables(
            6,
            &[2, 4, 6],
            &[12],
            &[[8, 2, 4], [10, 8, 7], [12, 10, 3]],
        ))
        .unwrap();
        let mut out = Vec::new();
        aig.write_gate(&mut out, 5).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "aag 6 3 0 1 2\n2\n4\n6\n10\n8 2 4\n10 8 7\no0 5\n"
        );
        // The evaluation order of the circuit is untouched
        assert_eq!(aig.dfs_list(), &[1, 2, 4, 3, 5, 6, 7]);

        // Output 7 reads 6 = 5 & !1, its fanin literal is written so the file reads back
        let mut out = Vec::new();
        aig.write_gate(&mut out, 7).unwrap();
        let cone = String::from_utf8(out).unwrap();
        assert_eq!(
            cone,
            "aag 6 3 0 1 3\n2\n4\n6\n12\n8 2 4\n10 8 7\n12 10 3\no0 7\n"
        );
        let reread = Aig::from_ascii(cone.as_bytes()).unwrap();
        assert_eq!(reread.num_ands(), 3);
        assert!(reread.check_integrity().is_ok());

        let mut out = Vec::new();
        assert!(matches!(
            aig.write_gate(&mut out, 42),
            Err(AigError::GateDoesNotExist(42))
        ));
    }
}
