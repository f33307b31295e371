#[macro_use]
mod macros;
mod parse;
pub mod ast;
mod block;
mod chi;
pub mod csv;
mod fields;
mod index;

pub use block::{block, format_block, named_blocks, strip_comments};
pub use chi::parse_chi;

use anyhow::Result;
use combine::EasyParser;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ParseError on line '{line}': {msg}")]
    Parse { msg: String, pos: usize, line: String },
    #[error("Block \"{0}\" not found (expected a line \"{0}\" followed by a line \"end {0}\")")]
    BlockNotFound(String),
    #[error("Unterminated quoted field starting before line {0}")]
    UnterminatedQuote(usize),
    #[error("Not an InChI or AMChI string: '{0}'")]
    UnknownIdentifier(String),
}

/// Parse a series of indices separated by commas and newlines,
/// with inclusive ranges written `start-stop`.
/// Repeated indices are dropped, keeping the order in which they first appear.
///
/// `"1,3, 5-9\n11"` parses to `[1, 3, 5, 6, 7, 8, 9, 11]`.
pub fn parse_index_series(text: &str) -> Result<Vec<usize>> {
    let idxs = parse::finish(text, index::index_series().easy_parse(text))?;
    Ok(util::unique_everseen(idxs))
}

/// Collect the `key=value` tokens from a line (or block) of text.
/// Other words are skipped. Spaces around `=` are allowed.
pub fn parse_fields(text: &str) -> Result<Vec<(&str, &str)>> {
    Ok(parse::finish(text, fields::fields().easy_parse(text))?)
}

/// Parse the lines of a pes block, each formatted `<pes>: <channel series>`.
pub fn parse_pes_entries(text: &str) -> Result<Vec<ast::PesEntry>> {
    let lines = parse::finish(text, index::pes_entries().easy_parse(text))?;
    let mut entries = Vec::with_capacity(lines.len());
    for (pes, channels) in lines {
        entries.push(ast::PesEntry {
            pes,
            channels: parse_index_series(channels)?,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    #[test]
    fn test_dedupe_keeps_first_seen_order() -> Result<()> {
        assert_eq!(vec![2, 1, 3, 4], super::parse_index_series("2,2,1,3-4,3")?);
        Ok(())
    }

    #[test]
    fn test_oversized_range() {
        let err = super::parse_index_series("1-2\n3-99999999999\n").unwrap_err();
        let err = err.downcast::<super::Error>().unwrap();
        assert!(matches!(err, super::Error::Parse { line, .. } if line == "3-99999999999"));
    }

    #[test]
    fn test_reparse_comma_form() -> Result<()> {
        let idxs = super::parse_index_series("1,3, 5-9  \n  11,13-14\n23\n 27-29")?;
        let joined: Vec<String> = idxs.iter().map(usize::to_string).collect();
        assert_eq!(idxs, super::parse_index_series(&joined.join(","))?);
        Ok(())
    }

    #[test]
    fn test_parse_error_quotes_line() {
        let err = super::parse_index_series("1-3\n4,x\n").unwrap_err();
        let err = err.downcast::<super::Error>().unwrap();
        assert!(matches!(err, super::Error::Parse { line, .. } if line == "4,x"));
    }

    #[test]
    fn test_pes_entries() -> Result<()> {
        let entries = super::parse_pes_entries("1: 1-2\n2: 3,3\n")?;
        assert_eq!(2, entries.len());
        assert_eq!(vec![1, 2], entries[0].channels);
        assert_eq!(2, entries[1].pes);
        assert_eq!(vec![3], entries[1].channels);
        Ok(())
    }
}
