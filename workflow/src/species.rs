use anyhow::Result;

use crate::Error;

// species.csv quotes SMILES and names with single quotes.
const QUOTE: char = '\'';
const CHI_COLUMN: &str = "inchi";

/// Rows of species.csv, in file order. Species are numbered from 1.
#[derive(Debug, Default)]
pub struct SpeciesTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SpeciesTable {
    pub fn parse(species_csv: &str) -> Result<Self> {
        let mut records = syntax::csv::parse_records(species_csv, QUOTE)?.into_iter();
        let header: Vec<String> = records
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|name| name.trim().to_owned())
            .collect();
        let rows: Vec<Vec<String>> = records.collect();
        log::debug!("Read {} species", rows.len());
        Ok(Self { header, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Result<usize, Error> {
        self.header
            .iter()
            .position(|col| col == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))
    }

    /// Get the InChI (or AMChI) of a species by its 1-based index.
    pub fn chi(&self, species: usize) -> Result<&str, Error> {
        let col = self.column(CHI_COLUMN)?;
        species
            .checked_sub(1)
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.get(col))
            .map(|chi| chi.trim())
            .ok_or_else(|| Error::SpeciesNotFound(species, self.len()))
    }
}
