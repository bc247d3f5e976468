use std::fs::File;
use std::io::BufReader;

use fraigkit::{Aig, AigEdge, AigError, SimConfig, SimError, fraig::ExhaustiveProver};

use test_log::test;

fn write(aig: &Aig) -> String {
    let mut out = Vec::new();
    aig.write_aag(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn single_and() {
    let aig = Aig::from_file("assets/circuits/single-and.aag").unwrap();
    let g = aig.get_gate(5).unwrap();
    assert!(g.is_and());
    let fanins: Vec<usize> = g.get_fanins().iter().map(AigEdge::get_id).collect();
    assert_eq!(fanins, vec![1, 2]);
    assert_eq!(aig.dfs_list(), &[1, 2, 5, 6]);
    assert!(aig.get_gate(6).unwrap().is_output());
    assert!(aig.get_gate(7).is_none());
}

#[test]
fn floating() {
    let mut aig = Aig::from_file("assets/circuits/floating.aag").unwrap();
    assert_eq!(aig.floating_gates(), &[4]);
    assert!(aig.get_gate(3).unwrap().is_undef());
    // Reachable from the output, nothing to sweep
    assert_eq!(aig.sweep(), 0);
    assert_eq!(write(&aig), "aag 4 1 0 1 1\n2\n8\n8 2 6\n");
}

#[test]
fn half_adder_file_sim() {
    let mut aig = Aig::from_file("assets/circuits/half-adder.aag").unwrap();
    assert_eq!(aig.get_gate(1).unwrap().get_name(), Some("x"));
    assert_eq!(aig.get_gate(9).unwrap().get_name(), Some("c"));

    let patterns = BufReader::new(File::open("assets/patterns/half-adder.pat").unwrap());
    let mut log = Vec::new();
    let report = aig.file_sim(patterns, Some(&mut log)).unwrap();
    assert_eq!(report.patterns, 4);
    assert_eq!(report.groups, 0);
    assert_eq!(
        String::from_utf8(log).unwrap(),
        "00 00\n01 10\n10 10\n11 01\n"
    );
    assert!(aig.fec_group(0).is_none());
}

#[test]
fn bad_pattern_file() {
    let mut aig = Aig::from_file("assets/circuits/half-adder.aag").unwrap();
    let patterns = BufReader::new(File::open("assets/patterns/bad-char.pat").unwrap());
    let err = aig.file_sim(patterns, None).unwrap_err();
    match err {
        AigError::SimError(e) => {
            assert!(matches!(e, SimError::NonBoolean { ch: 'x', .. }));
            assert_eq!(e.simulated(), 1);
        }
        e => panic!("unexpected error {:?}", e),
    }
}

#[test]
fn full_flow() {
    let mut aig = Aig::from_file("assets/circuits/redundant.aag").unwrap();
    assert_eq!(aig.num_ands(), 7);
    assert_eq!(aig.unused_gates(), &[10]);

    assert_eq!(aig.sweep(), 1);
    assert!(aig.get_gate(10).is_none());

    // 7 = 5 & 0 and 8 = 3 & 3
    assert_eq!(aig.optimize(), 2);
    assert_eq!(
        aig.get_gate(9).unwrap().get_fanins(),
        &[AigEdge::new(3, false), AigEdge::new(6, true)]
    );

    // 5 = 2 & 1 duplicates 4 = 1 & 2
    assert_eq!(aig.strash(), 1);
    assert_eq!(aig.num_ands(), 3);

    // 6 = 4 & 1 is 4, which only simulation notices
    let report = aig.random_sim(&SimConfig::default(), None).unwrap();
    assert_eq!(report.groups, 1);
    assert_eq!(aig.fec_group(0), Some(&[4, 6][..]));
    assert_eq!(aig.fraig(&mut ExhaustiveProver::default()), 1);
    assert_eq!(aig.num_ands(), 2);
    assert!(aig.check_integrity().is_ok());

    let expected = "\
aag 10 3 0 4 2
2
4
6
8
0
18
9
8 2 4
18 6 9
i0 a
i1 b
i2 c
o0 ab
o1 zero
o2 f
o3 nab
";
    assert_eq!(write(&aig), expected);

    // Nothing left to do
    let reread = Aig::from_ascii(expected.as_bytes()).unwrap();
    let mut again = reread.clone();
    assert_eq!(again.sweep(), 0);
    assert_eq!(again.optimize(), 0);
    assert_eq!(again.strash(), 0);
    assert_eq!(again, reread);
}

#[test]
fn write_gate_reads_back() {
    let mut aig = Aig::from_file("assets/circuits/half-adder.aag").unwrap();
    let mut out = Vec::new();
    aig.write_gate(&mut out, 3).unwrap();
    let cone = String::from_utf8(out).unwrap();
    assert_eq!(
        cone,
        "aag 7 2 0 1 3\n2\n4\n6\n12 2 4\n14 3 5\n6 13 15\ni0 x\ni1 y\no0 3\n"
    );

    let sum = Aig::from_ascii(cone.as_bytes()).unwrap();
    assert_eq!(sum.get_gate(8).unwrap().get_name(), Some("3"));
    assert_eq!(sum.num_ands(), 3);
}
