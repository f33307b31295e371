//! Layers of InChI and AMChI structure identifiers.
//!
//! Only the layers needed to rebuild the heavy-atom connectivity are read:
//! the formula, the connection layer (`/c`) and the hydrogen layer (`/h`).
//! Stereo, charge and isotope layers are skipped.

use anyhow::Result;

use crate::ast::{ChiComponent, ChiLayers};
use crate::parse::prelude::*;
use crate::parse::util::integer;
use crate::Error;

const PREFIXES: [&str; 3] = ["InChI=1S", "InChI=1", "AMChI=1"];

/// (atom, bonds) for one chain of the connection layer.
type Chain = (usize, Vec<(usize, usize)>);

p! {
    element() -> (&'a str, usize), {
        recognize(
            satisfy(|c: char| c.is_ascii_uppercase())
                .and(skip_many(satisfy(|c: char| c.is_ascii_lowercase())))
        )
        .and(optional(integer()))
        .map(|(symbol, count)| (symbol, count.unwrap_or(1)))
    }
}

p! {
    formula_component() -> (usize, Vec<(&'a str, usize)>), {
        optional(integer())
            .and(many1(element()))
            .map(|(mult, elements)| (mult.unwrap_or(1), elements))
    }
}

p! {
    formula() -> Vec<(usize, Vec<(&'a str, usize)>)>, {
        sep_by1(formula_component(), char('.')).skip(eof())
    }
}

p! {
    chain() -> Chain, {
        integer()
            .and(many(between(char('('), char(')'), sep_by1(chain(), char(',')))))
            .and(optional(choice!(char('-').with(chain()), chain())))
            .map(|((atom, branches), next): ((usize, Vec<Vec<Chain>>), Option<Chain>)| {
                let mut bonds = Vec::new();
                for (head, mut sub_bonds) in branches.into_iter().flatten().chain(next) {
                    bonds.push((atom, head));
                    bonds.append(&mut sub_bonds);
                }
                (atom, bonds)
            })
    }
}

p! {
    connections() -> Vec<(usize, usize)>, {
        chain().skip(eof()).map(|(_, bonds)| bonds)
    }
}

p! {
    atom_ref() -> Vec<usize>, {
        integer()
            .and(optional(char('-').with(integer())))
            .map(|(start, stop)| match stop {
                Some(stop) => (start..=stop).collect(),
                None => vec![start],
            })
    }
}

p! {
    hydrogen_group() -> Vec<(usize, usize)>, {
        choice!(
            sep_by1(atom_ref(), char(','))
                .skip(char('H'))
                .and(optional(integer()))
                .map(|(atoms, count): (Vec<Vec<usize>>, Option<usize>)| {
                    let count = count.unwrap_or(1);
                    atoms.into_iter().flatten().map(|atom| (atom, count)).collect()
                }),
            // mobile hydrogens, e.g. `(H,3,4)`, go on the first atom listed:
            between(
                char('('),
                char(')'),
                char('H')
                    .with(optional(integer()))
                    .skip(skip_many(none_of(",)".chars())))
                    .skip(char(','))
                    .and(sep_by1(atom_ref(), char(',')))
            )
            .map(|(count, atoms): (Option<usize>, Vec<Vec<usize>>)| {
                atoms
                    .into_iter()
                    .flatten()
                    .next()
                    .map(|atom| (atom, count.unwrap_or(1)))
                    .into_iter()
                    .collect()
            })
        )
    }
}

p! {
    hydrogens() -> Vec<(usize, usize)>, {
        sep_by1(hydrogen_group(), char(','))
            .skip(eof())
            .map(|groups: Vec<Vec<(usize, usize)>>| groups.into_iter().flatten().collect())
    }
}

/// Parse the main layers of an InChI or AMChI string.
pub fn parse_chi(chi: &str) -> Result<ChiLayers<'_>> {
    use combine::EasyParser;

    let mut layers = chi.trim().split('/');
    let prefix = layers.next().unwrap_or_default();
    if !PREFIXES.contains(&prefix) {
        return Err(Error::UnknownIdentifier(chi.to_owned()).into());
    }
    let formula_layer = layers
        .next()
        .ok_or_else(|| Error::UnknownIdentifier(chi.to_owned()))?;

    let mut components = Vec::new();
    for (mult, elements) in crate::parse::finish(formula_layer, formula().easy_parse(formula_layer))? {
        let atoms: Vec<&str> = elements
            .iter()
            .filter(|(symbol, _)| *symbol != "H")
            .flat_map(|&(symbol, count)| std::iter::repeat(symbol).take(count))
            .collect();
        for _ in 0..mult {
            components.push(ChiComponent {
                atoms: atoms.clone(),
                ..Default::default()
            });
        }
    }

    for layer in layers {
        match layer.split_at(layer.chars().next().map_or(0, char::len_utf8)) {
            ("c", rest) => {
                for (component, text) in components.iter_mut().zip(expand_components(rest)) {
                    if !text.is_empty() {
                        component.bonds = crate::parse::finish(text, connections().easy_parse(text))?;
                    }
                }
            }
            ("h", rest) => {
                for (component, text) in components.iter_mut().zip(expand_components(rest)) {
                    if !text.is_empty() {
                        component.hydrogens = crate::parse::finish(text, hydrogens().easy_parse(text))?;
                    }
                }
            }
            // everything after the fixed-H marker describes a different tautomer:
            ("f", _) => break,
            _ => (),
        }
    }

    Ok(ChiLayers { components })
}

/// Split a layer into per-component parts, expanding `n*` repetitions.
fn expand_components(layer: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for part in layer.split(';') {
        match part.split_once('*') {
            Some((count, rest)) if count.chars().all(|c| c.is_ascii_digit()) => {
                let count: usize = count.parse().unwrap_or(1);
                parts.extend(std::iter::repeat(rest).take(count));
            }
            _ => parts.push(part),
        }
    }
    parts
}

#[cfg(test)]
mod test {
    use anyhow::Result;
    use combine::EasyParser;
    #[test]
    fn test_formula() -> Result<()> {
        assert_eq!(
            vec![(1, vec![("C", 2), ("H", 6), ("O", 1)])],
            super::formula().easy_parse("C2H6O").unwrap().0
        );
        assert_eq!(
            vec![(1, vec![("C", 1), ("H", 3), ("Cl", 1)]), (2, vec![("H", 2), ("O", 1)])],
            super::formula().easy_parse("CH3Cl.2H2O").unwrap().0
        );
        Ok(())
    }
    #[test]
    fn test_connections() -> Result<()> {
        assert_eq!(
            vec![(1, 3), (3, 5), (5, 4), (4, 2)],
            super::connections().easy_parse("1-3-5-4-2").unwrap().0
        );
        // isobutane: 4 branches off of atom 4
        assert_eq!(
            vec![(1, 4), (4, 2), (4, 3)],
            super::connections().easy_parse("1-4(2)3").unwrap().0
        );
        assert_eq!(
            vec![(1, 5), (5, 2), (5, 3), (5, 4)],
            super::connections().easy_parse("1-5(2,3)4").unwrap().0
        );
        // benzene ring closure:
        assert_eq!(
            vec![(1, 2), (2, 4), (4, 6), (6, 5), (5, 3), (3, 1)],
            super::connections().easy_parse("1-2-4-6-5-3-1").unwrap().0
        );
        Ok(())
    }
    #[test]
    fn test_hydrogens() -> Result<()> {
        assert_eq!(
            vec![(3, 2), (4, 2), (5, 2), (1, 3), (2, 3)],
            super::hydrogens().easy_parse("3-5H2,1-2H3").unwrap().0
        );
        assert_eq!(
            vec![(3, 1), (2, 2), (1, 3)],
            super::hydrogens().easy_parse("3H,2H2,1H3").unwrap().0
        );
        assert_eq!(
            vec![(1, 3), (2, 1)],
            super::hydrogens().easy_parse("1H3,(H,2,3)").unwrap().0
        );
        assert_eq!(
            vec![(4, 2)],
            super::hydrogens().easy_parse("(H2,4,5-6)").unwrap().0
        );
        Ok(())
    }
    #[test]
    fn test_parse_chi() -> Result<()> {
        let layers = super::parse_chi("InChI=1S/C2H6O.H2O/c1-2-3;/h3H,2H2,1H3;1H2")?;
        assert_eq!(2, layers.components.len());
        assert_eq!(vec!["C", "C", "O"], layers.components[0].atoms);
        assert_eq!(vec![(1, 2), (2, 3)], layers.components[0].bonds);
        assert_eq!(vec![(3, 1), (2, 2), (1, 3)], layers.components[0].hydrogens);
        assert_eq!(vec!["O"], layers.components[1].atoms);
        assert_eq!(vec![(1, 2)], layers.components[1].hydrogens);

        let layers = super::parse_chi("AMChI=1/CH4/h1H4")?;
        assert_eq!(vec![(1, 4)], layers.components[0].hydrogens);

        assert!(super::parse_chi("C2H6O").is_err());
        Ok(())
    }
}
