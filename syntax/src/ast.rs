/// A block with a name on its header line, e.g. `level lvl_wbs ... end level`.
#[derive(Debug, PartialEq, Eq)]
pub struct NamedBlock<'a> {
    /// Name following the keyword on the header line
    pub name: &'a str,
    /// Raw text between the header and `end` lines
    pub content: &'a str,
}

/// One `<pes>: <channels>` line of a pes block, with the channels expanded.
#[derive(Debug, PartialEq, Eq)]
pub struct PesEntry {
    pub pes: usize,
    pub channels: Vec<usize>,
}

/// One disconnected component of a structure identifier.
/// Atom numbers in `bonds` and `hydrogens` are 1-based indices into `atoms`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChiComponent<'a> {
    /// Element symbols of the non-hydrogen atoms, in numbering order
    pub atoms: Vec<&'a str>,
    /// Heavy-atom connections
    pub bonds: Vec<(usize, usize)>,
    /// (atom, number of attached hydrogens)
    pub hydrogens: Vec<(usize, usize)>,
}

/// The connectivity layers of an InChI or AMChI string.
#[derive(Debug, PartialEq, Eq)]
pub struct ChiLayers<'a> {
    pub components: Vec<ChiComponent<'a>>,
}
