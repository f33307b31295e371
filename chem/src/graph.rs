use std::collections::VecDeque;

use anyhow::Result;

use crate::Error;

/// A non-hydrogen atom. Hydrogens are implicit.
#[derive(Debug)]
struct Atom {
    /// Normal valence of the element, if we know it
    valence: Option<usize>,
    /// Number of attached hydrogens
    hydrogens: usize,
    /// Indices of bonded heavy atoms
    neighbors: Vec<usize>,
}

impl Atom {
    fn degree(&self) -> usize {
        self.neighbors.len() + self.hydrogens
    }
}

/// Heavy-atom connectivity of a molecule, with bond orders
/// inferred from each atom's leftover valence.
#[derive(Debug)]
pub struct MolGraph {
    atoms: Vec<Atom>,
    /// (atom, atom, bond order)
    bonds: Vec<(usize, usize, usize)>,
}

impl MolGraph {
    /// Build a graph from the formula, connection and hydrogen layers of an InChI or AMChI.
    pub fn from_chi(chi: &str) -> Result<Self> {
        let layers = syntax::parse_chi(chi)?;

        let mut atoms = Vec::new();
        let mut bonds = Vec::new();
        for component in &layers.components {
            // a hydrogen-only component (e.g. H2) has no heavy atoms to number.
            if component.atoms.is_empty() {
                continue;
            }
            let offset = atoms.len();
            let natoms = component.atoms.len();
            let index = |atom: usize| {
                if atom == 0 || atom > natoms {
                    Err(Error::AtomOutOfRange {
                        chi: chi.to_owned(),
                        atom,
                        natoms,
                    })
                } else {
                    Ok(offset + atom - 1)
                }
            };

            atoms.extend(component.atoms.iter().map(|symbol| Atom {
                valence: valence(symbol),
                hydrogens: 0,
                neighbors: Vec::with_capacity(4),
            }));
            for &(atom, count) in &component.hydrogens {
                atoms[index(atom)?].hydrogens += count;
            }
            for &(a, b) in &component.bonds {
                let (a, b) = (index(a)?, index(b)?);
                atoms[a].neighbors.push(b);
                atoms[b].neighbors.push(a);
                bonds.push((a, b, 1));
            }
        }

        let mut graph = Self { atoms, bonds };
        graph.assign_bond_orders();
        Ok(graph)
    }

    /// Pair up leftover valences across bonds until none can be paired.
    fn assign_bond_orders(&mut self) {
        let mut free: Vec<usize> = self
            .atoms
            .iter()
            .map(|atom| atom.valence.map_or(0, |v| v.saturating_sub(atom.degree())))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (a, b, order) in self.bonds.iter_mut() {
                if free[*a] > 0 && free[*b] > 0 {
                    free[*a] -= 1;
                    free[*b] -= 1;
                    *order += 1;
                    changed = true;
                }
            }
        }
    }

    /// An atom is linear if it has a triple bond or two double bonds.
    fn is_linear(&self, atom: usize) -> bool {
        let mut doubles = 0;
        for &(a, b, order) in &self.bonds {
            if a == atom || b == atom {
                match order {
                    1 => (),
                    2 => doubles += 1,
                    _ => return true,
                }
            }
        }
        doubles > 1
    }

    /// A carbon whose only heavy neighbor is `other` rotates as a methyl-type group.
    fn is_ch_rotor(&self, atom: usize, other: usize) -> bool {
        let atom = &self.atoms[atom];
        atom.valence == Some(CARBON_VALENCE) && atom.neighbors == [other]
    }

    /// true if `a` and `b` are still connected once the bond between them is removed.
    fn in_ring(&self, a: usize, b: usize) -> bool {
        let mut seen = vec![false; self.atoms.len()];
        let mut queue = VecDeque::from([a]);
        seen[a] = true;
        while let Some(atom) = queue.pop_front() {
            for &next in &self.atoms[atom].neighbors {
                if atom == a && next == b {
                    continue;
                }
                if next == b {
                    return true;
                }
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Single, acyclic bonds with something to rotate on both ends,
    /// excluding bonds to linear atoms and to methyl-type groups.
    pub fn rotational_bonds(&self) -> Vec<(usize, usize)> {
        self.bonds
            .iter()
            .filter(|&&(a, b, order)| {
                order == 1
                    && self.atoms[a].degree() > 1
                    && self.atoms[b].degree() > 1
                    && !self.is_linear(a)
                    && !self.is_linear(b)
                    && !self.is_ch_rotor(a, b)
                    && !self.is_ch_rotor(b, a)
                    && !self.in_ring(a, b)
            })
            .map(|&(a, b, _)| (a, b))
            .collect()
    }
}

const CARBON_VALENCE: usize = 4;

// carbon and silicon are the only tetravalent elements we expect to see.
fn valence(symbol: &str) -> Option<usize> {
    match symbol {
        "C" | "Si" => Some(CARBON_VALENCE),
        "N" | "P" | "B" => Some(3),
        "O" | "S" | "Se" => Some(2),
        "F" | "Cl" | "Br" | "I" => Some(1),
        _ => None,
    }
}
