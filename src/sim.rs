//! Bit-parallel simulation and FEC (functionally equivalent candidates) partitioning.
//!
//! Each gate holds a 64-bit word, one bit per pattern, so a simulation round evaluates
//! 64 input patterns at once. A campaign starts with a single candidate group made of
//! the constant and every and gate of the evaluation order, then each round splits the
//! groups according to the simulated values. A value and its bitwise complement fall in
//! the same group (see [`SimValueKey`]), so groups gather gates that are equivalent up to
//! inversion on every pattern simulated so far.
//!
//! Candidates are handed over to [`Aig::fraig`](crate::Aig::fraig) for proof.

use std::io::{BufRead, Write};

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    Aig, GateId, GateKind, Result, SimError,
    hash::{BucketMap, SimValueKey},
};

/// Number of patterns simulated by a single round.
pub const WORD_SIZE: usize = u64::BITS as usize;

/// Parameters of a random simulation campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seed of the pseudo-random pattern generator.
    pub seed: u64,
    /// Number of consecutive stable rounds after which the campaign stops.
    pub stable_rounds: usize,
    /// A round is stable if the number of groups changed by at most
    /// `tolerance` times the number of groups before the round.
    pub tolerance: f64,
    /// Stops the campaign once at least this many patterns were simulated.
    pub max_patterns: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: 0,
            stable_rounds: 20,
            tolerance: 0.001,
            max_patterns: None,
        }
    }
}

/// Summary of a simulation campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimReport {
    /// Number of patterns simulated.
    pub patterns: usize,
    /// Number of FEC groups at the end of the campaign.
    pub groups: usize,
}

fn edge_value(value: u64, complement: bool) -> u64 {
    if complement { !value } else { value }
}

/// Parses a pattern into the bit `k` of the input words.
fn read_pattern(
    pattern: &str,
    words: &mut [u64],
    k: usize,
    simulated: usize,
) -> std::result::Result<(), SimError> {
    let len = pattern.chars().count();
    if len != words.len() {
        return Err(SimError::PatternWidth {
            pattern: pattern.to_string(),
            len,
            inputs: words.len(),
            simulated,
        });
    }
    for (word, ch) in words.iter_mut().zip(pattern.chars()) {
        match ch {
            '0' => *word &= !(1 << k),
            '1' => *word |= 1 << k,
            _ => {
                return Err(SimError::NonBoolean {
                    pattern: pattern.to_string(),
                    ch,
                    simulated,
                });
            }
        }
    }
    Ok(())
}

impl Aig {
    /// Evaluates gate `id` from the values of its fanins.
    fn eval(&self, id: GateId) -> u64 {
        let gate = self.gate(id);
        gate.fanins
            .iter()
            .map(|e| edge_value(self.gate(e.id).value, e.complement))
            .fold(u64::MAX, |acc, v| acc & v)
    }

    /// Iterative post-order evaluation of the cone of `root`,
    /// gates already simulated in this round are not evaluated again.
    fn simulate_cone(&mut self, root: GateId) {
        let mut stack: Vec<(GateId, bool)> = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                let value = self.eval(id);
                self.gate_mut(id).value = value;
                continue;
            }
            if self.is_visited(id) {
                continue;
            }
            self.mark_visited(id);

            let gate = self.gate_mut(id);
            match gate.kind {
                GateKind::Input { .. } => (),
                GateKind::Const | GateKind::Undef => gate.value = 0,
                GateKind::And | GateKind::Output { .. } => {
                    stack.push((id, true));
                    for i in (0..gate.fanins.len()).rev() {
                        let fanin = gate.fanins[i].id;
                        stack.push((fanin, false));
                    }
                }
            }
        }
    }

    /// Simulates one round of 64 patterns: `words[j]` holds the 64 values of input `j`.
    ///
    /// Afterwards every gate reachable from an output holds its simulated value.
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one word per input.
    pub fn simulate(&mut self, words: &[u64]) {
        assert_eq!(
            words.len(),
            self.inputs.len(),
            "expected one simulation word per input"
        );
        self.new_epoch();
        for (i, &word) in words.iter().enumerate() {
            let pi = self.inputs[i];
            self.gate_mut(pi).value = word;
            self.mark_visited(pi);
        }
        for i in 0..self.outputs.len() {
            let po = self.outputs[i];
            self.simulate_cone(po);
        }
    }

    /// Starts a campaign: a single candidate group with the constant and
    /// every and gate of the evaluation order.
    pub fn init_fec_groups(&mut self) {
        for gate in self.gates.iter_mut().flatten() {
            gate.group = None;
        }
        let mut group = vec![0];
        group.extend(
            self.dfs_list
                .iter()
                .copied()
                .filter(|&id| self.gate(id).is_and()),
        );
        self.fec_groups = vec![group];
    }

    /// Splits every group according to the last simulated values.
    ///
    /// Gates left alone in their bucket are proven distinct from all the others
    /// and leave the campaign.
    pub fn split_fec_groups(&mut self) {
        let mut next = Vec::new();
        for group in std::mem::take(&mut self.fec_groups) {
            let mut buckets: BucketMap<SimValueKey, Vec<GateId>> = BucketMap::new(group.len());
            for id in group {
                let key = SimValueKey(self.gate(id).value);
                buckets.query_or_insert(key, Vec::new()).0.push(id);
            }
            for (_, members) in buckets {
                if members.len() > 1 {
                    next.push(members);
                } else {
                    for id in members {
                        self.gate_mut(id).group = None;
                    }
                }
            }
        }
        self.fec_groups = next;
    }

    /// Sorts members by id and groups by their first member,
    /// then records in each member the index of its group.
    pub fn sort_and_record(&mut self) {
        for group in &mut self.fec_groups {
            group.sort_unstable();
        }
        self.fec_groups.sort_unstable_by_key(|g| g[0]);
        for i in 0..self.fec_groups.len() {
            for j in 0..self.fec_groups[i].len() {
                let id = self.fec_groups[i][j];
                self.gate_mut(id).group = Some(i);
            }
        }
    }

    /// Writes one line per pattern: input bits, a space, then output bits.
    fn write_sim_log(&self, log: &mut dyn Write, words: &[u64], num: usize) -> Result<()> {
        for k in 0..num {
            let mut line = String::with_capacity(words.len() + self.outputs.len() + 1);
            for &word in words {
                line.push(if (word >> k) & 1 == 1 { '1' } else { '0' });
            }
            line.push(' ');
            for &po in &self.outputs {
                line.push(if (self.gate(po).value >> k) & 1 == 1 { '1' } else { '0' });
            }
            writeln!(log, "{}", line)?;
        }
        Ok(())
    }

    /// One campaign round: simulation, split, then log of the `num` first patterns.
    fn sim_round(
        &mut self,
        words: &[u64],
        num: usize,
        log: Option<&mut (dyn Write + '_)>,
    ) -> Result<()> {
        self.simulate(words);
        self.split_fec_groups();
        log::debug!("Total #FEC Group = {}", self.fec_groups.len());
        if let Some(log) = log {
            self.write_sim_log(log, words, num)?;
        }
        Ok(())
    }

    /// Random simulation campaign, until the number of groups is stable
    /// (see [`SimConfig`]).
    pub fn random_sim(
        &mut self,
        config: &SimConfig,
        mut log: Option<&mut dyn Write>,
    ) -> Result<SimReport> {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut words = vec![0u64; self.inputs.len()];
        let mut patterns = 0;
        let mut stable = 0;

        self.init_fec_groups();
        while stable < config.stable_rounds {
            if config.max_patterns.is_some_and(|max| patterns >= max) {
                break;
            }
            for word in words.iter_mut() {
                *word = rng.r#gen();
            }
            let previous = self.fec_groups.len();
            self.sim_round(&words, WORD_SIZE, log.as_deref_mut())?;
            patterns += WORD_SIZE;

            let delta = self.fec_groups.len().abs_diff(previous);
            if delta as f64 <= config.tolerance * previous as f64 {
                stable += 1;
            } else {
                stable = 0;
            }
        }
        self.sort_and_record();

        log::info!("{} patterns simulated.", patterns);
        Ok(SimReport {
            patterns,
            groups: self.fec_groups.len(),
        })
    }

    /// Simulation campaign from whitespace-separated patterns, one character per input
    /// in declaration order.
    ///
    /// An invalid pattern aborts the campaign: the patterns read before it are still
    /// simulated and the resulting groups recorded, then a [`SimError`] telling how many
    /// patterns were simulated is returned.
    pub fn file_sim(
        &mut self,
        reader: impl BufRead,
        mut log: Option<&mut dyn Write>,
    ) -> Result<SimReport> {
        let mut words = vec![0u64; self.inputs.len()];
        let mut patterns = 0;
        let mut num = 0;

        self.init_fec_groups();
        let mut failure = None;
        'lines: for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    failure = Some(SimError::IoError {
                        msg: e.to_string(),
                        simulated: patterns + num,
                    });
                    break;
                }
            };
            for pattern in line.split_whitespace() {
                if let Err(e) = read_pattern(pattern, &mut words, num, patterns + num) {
                    failure = Some(e);
                    break 'lines;
                }
                num += 1;
                if num == WORD_SIZE {
                    self.sim_round(&words, num, log.as_deref_mut())?;
                    patterns += num;
                    num = 0;
                }
            }
        }

        // Patterns left, padded with 0
        if num != 0 {
            for word in words.iter_mut() {
                *word &= u64::MAX >> (WORD_SIZE - num);
            }
            self.sim_round(&words, num, log.as_deref_mut())?;
            patterns += num;
        }
        self.sort_and_record();

        if let Some(e) = failure {
            log::warn!("{}", e);
            return Err(e.into());
        }
        log::info!("{} patterns simulated.", patterns);
        Ok(SimReport {
            patterns,
            groups: self.fec_groups.len(),
        })
    }

    /// FEC groups of the last campaign, sorted.
    pub fn fec_groups(&self) -> &[Vec<GateId>] {
        &self.fec_groups
    }

    /// FEC group of given index, [`None`] if out of range.
    pub fn fec_group(&self, idx: usize) -> Option<&[GateId]> {
        self.fec_groups.get(idx).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aig::test::tables;
    use crate::AigError;

    use test_log::test;

    /// Outputs: 1, !2, 1 & 2, !(!1 & !2) (1 | 2), 2 & 1, 1 & 2 & !1.
    fn circuit() -> Aig {
        Aig::from_tables(tables(
            6,
            &[2, 4],
            &[2, 5, 6, 9, 10, 12],
            &[[6, 2, 4], [8, 3, 5], [10, 4, 2], [12, 6, 3]],
        ))
        .unwrap()
    }

    #[test]
    fn identity() {
        let mut aig = Aig::from_tables(tables(2, &[2, 4], &[2, 5], &[])).unwrap();
        let mut log = Vec::new();
        let report = aig.file_sim("01\n10\n".as_bytes(), Some(&mut log)).unwrap();
        assert_eq!(report.patterns, 2);
        assert_eq!(String::from_utf8(log).unwrap(), "01 00\n10 11\n");
        // Pattern k is bit k
        assert_eq!(aig.get_gate(3).unwrap().get_value(), 0b10);
        assert_eq!(aig.get_gate(4).unwrap().get_value(), !0b01);
    }

    #[test]
    fn simulate_values() {
        let mut aig = circuit();
        aig.simulate(&[0b1100, 0b1010]);
        let value = |id| aig.get_gate(id).unwrap().get_value();
        assert_eq!(value(3), 0b1000);
        assert_eq!(value(4), !0b1100 & !0b1010);
        assert_eq!(value(5), 0b1000);
        assert_eq!(value(6), 0);
        assert_eq!(value(7), 0b1100);
        assert_eq!(value(8), !0b1010);
        assert_eq!(value(10), 0b1110);
        assert_eq!(value(12), 0);
    }

    #[test]
    fn undef_is_zero() {
        // 2 = 1 & !3 with 3 undefined
        let mut aig = Aig::from_tables(tables(3, &[2], &[4], &[[4, 2, 7]])).unwrap();
        aig.simulate(&[0b01]);
        assert_eq!(aig.get_gate(4).unwrap().get_value(), 0b01);
    }

    #[test]
    fn fec_groups_from_random_sim() {
        let mut aig = circuit();
        let report = aig.random_sim(&SimConfig::default(), None).unwrap();
        assert_eq!(report.patterns % WORD_SIZE, 0);
        assert!(report.patterns >= 20 * WORD_SIZE);
        // 3 and 5 are the same, 6 is constant, 4 is the complement of 1 | 2 ...
        assert_eq!(aig.fec_groups(), &[vec![0, 6], vec![3, 5]]);
        assert_eq!(report.groups, 2);
        assert_eq!(aig.fec_group(1), Some(&[3, 5][..]));
        assert_eq!(aig.fec_group(2), None);
        assert_eq!(aig.get_gate(5).unwrap().get_group(), Some(1));
        assert_eq!(aig.get_gate(0).unwrap().get_group(), Some(0));
        assert_eq!(aig.get_gate(4).unwrap().get_group(), None);
        assert_eq!(aig.get_gate(1).unwrap().get_group(), None);
    }

    #[test]
    fn groups_only_shrink() {
        let mut aig = circuit();
        aig.init_fec_groups();
        assert_eq!(aig.fec_groups(), &[vec![0, 3, 4, 5, 6]]);
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..10 {
            let before = aig.fec_groups().to_vec();
            aig.simulate(&[rng.r#gen(), rng.r#gen()]);
            aig.split_fec_groups();
            for group in aig.fec_groups() {
                assert!(before.iter().any(|b| group.iter().all(|id| b.contains(id))));
                let v = aig.get_gate(group[0]).unwrap().get_value();
                for &id in group {
                    let w = aig.get_gate(id).unwrap().get_value();
                    assert!(w == v || w == !v);
                }
            }
        }
    }

    #[test]
    fn max_patterns() {
        let mut aig = circuit();
        let config = SimConfig {
            max_patterns: Some(100),
            stable_rounds: 1000,
            ..Default::default()
        };
        let report = aig.random_sim(&config, None).unwrap();
        assert_eq!(report.patterns, 128);
    }

    #[test]
    fn file_sim_batches() {
        let mut aig = circuit();
        let mut content = String::new();
        for k in 0..70 {
            content.push_str(["00 ", "01 ", "10 ", "11\n"][k % 4]);
        }
        let mut log = Vec::new();
        let report = aig.file_sim(content.as_bytes(), Some(&mut log)).unwrap();
        assert_eq!(report.patterns, 70);
        let log = String::from_utf8(log).unwrap();
        assert_eq!(log.lines().count(), 70);
        assert_eq!(log.lines().nth(67).unwrap(), "11 101110");
        assert_eq!(log.lines().nth(68).unwrap(), "00 010000");
        assert_eq!(aig.fec_groups(), &[vec![0, 6], vec![3, 5]]);
    }

    #[test]
    fn file_sim_errors() {
        let mut aig = circuit();
        let err = aig.file_sim("00 11\n01 1\n10".as_bytes(), None).unwrap_err();
        match err {
            AigError::SimError(e @ SimError::PatternWidth { len: 1, .. }) => {
                assert_eq!(e.simulated(), 3)
            }
            e => panic!("unexpected error {:?}", e),
        }
        // The three valid patterns were still simulated: 3 and 4 were told apart
        assert_eq!(aig.get_gate(3).unwrap().get_value(), 0b010);
        assert_eq!(aig.fec_groups(), &[vec![0, 6], vec![3, 5]]);

        let err = aig.file_sim("00 1x".as_bytes(), None).unwrap_err();
        assert!(matches!(
            err,
            AigError::SimError(SimError::NonBoolean {
                ch: 'x',
                simulated: 1,
                ..
            })
        ));
    }

    #[test]
    fn empty_file() {
        let mut aig = circuit();
        let report = aig.file_sim("\n\n".as_bytes(), None).unwrap();
        assert_eq!(report.patterns, 0);
        assert_eq!(report.groups, 1);
    }
}
