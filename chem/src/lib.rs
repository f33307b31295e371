/// Heavy-atom graph built from a structure identifier
mod graph;
pub use graph::MolGraph;

/// Monte-Carlo sample-count heuristic
mod sample;
pub use sample::{worker_count, SampleParams};

use anyhow::Result;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Atom {atom} referenced in '{chi}' but the formula only has {natoms} heavy atoms")]
    AtomOutOfRange {
        chi: String,
        atom: usize,
        natoms: usize,
    },
}

/// Count the torsional degrees of freedom of the molecule described by an
/// InChI or AMChI string, not counting methyl-type rotors.
pub fn torsion_count(chi: &str) -> Result<usize> {
    let graph = MolGraph::from_chi(chi)?;
    let ntors = graph.rotational_bonds().len();
    log::trace!("{ntors} torsions in {chi}");
    Ok(ntors)
}
