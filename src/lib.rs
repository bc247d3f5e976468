//! And-Inverter Graphs reduction engine.
//!
//! ```no_run
//! use fraigkit::{Aig, SimConfig, fraig::ExhaustiveProver};
//!
//! let mut aig = Aig::from_file("assets/circuits/half-adder.aag").unwrap();
//! aig.sweep();
//! aig.optimize();
//! aig.strash();
//! aig.random_sim(&SimConfig::default(), None).unwrap();
//! aig.fraig(&mut ExhaustiveProver::default());
//! aig.write_aag(&mut std::io::stdout()).unwrap();
//! ```

pub mod aig;
pub mod fraig;
pub mod hash;
pub mod sim;

// Re-exporting symbols and modules.
pub use aig::{
    Aig, AigEdge, AigError, CircuitTables, Gate, GateId, GateKind, Literal, ParserError, Result,
    SimError,
};
pub use fraig::EquivalenceProver;
pub use sim::{SimConfig, SimReport};
