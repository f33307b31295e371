//! Delimited record tables, e.g. `species.csv` (quoted with `'`)
//! or the per-group subtask tables (quoted with `"`).

use crate::Error;

const DELIM: char = ',';

/// Split `text` into records of fields.
/// Blank lines are skipped; `quote` may be doubled inside a quoted field to escape it.
pub fn parse_records(text: &str, quote: char) -> Result<Vec<Vec<String>>, Error> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line_num = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == quote {
                if chars.peek() == Some(&quote) {
                    field.push(quote);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                if c == '\n' {
                    line_num += 1;
                }
                field.push(c);
            }
            continue;
        }
        match c {
            c if c == quote => in_quotes = true,
            DELIM => record.push(std::mem::take(&mut field)),
            '\r' => (),
            '\n' => {
                line_num += 1;
                end_record(&mut records, &mut record, &mut field);
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::UnterminatedQuote(line_num));
    }
    end_record(&mut records, &mut record, &mut field);
    Ok(records)
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    if record.is_empty() && field.trim().is_empty() {
        field.clear();
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Append one record, terminated by a newline, to `buf`.
/// Fields are quoted only if they contain a delimiter, a quote, or a line break.
pub fn write_record<'a, T>(buf: &mut String, fields: T, quote: char)
where
    T: IntoIterator<Item = &'a str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            buf.push(DELIM);
        }
        if field.contains([DELIM, quote, '\n', '\r']) {
            buf.push(quote);
            for c in field.chars() {
                if c == quote {
                    buf.push(quote);
                }
                buf.push(c);
            }
            buf.push(quote);
        } else {
            buf.push_str(field);
        }
    }
    buf.push('\n');
}

#[cfg(test)]
mod test {
    use anyhow::Result;
    #[test]
    fn test_species_csv() -> Result<()> {
        let text = "name,smiles,inchi,mult\n\
                    C3H8,CCC,'InChI=1S/C3H8/c1-3-2/h3H2,1-2H3',1\n\n\
                    OH,[OH],'InChI=1S/HO/h1H',2\n";
        let records = super::parse_records(text, '\'')?;
        assert_eq!(3, records.len());
        assert_eq!(vec!["name", "smiles", "inchi", "mult"], records[0]);
        assert_eq!("InChI=1S/C3H8/c1-3-2/h3H2,1-2H3", records[1][2]);
        assert_eq!("2", records[2][3]);
        Ok(())
    }
    #[test]
    fn test_write_then_read() -> Result<()> {
        let mut buf = String::new();
        super::write_record(&mut buf, ["task", "01"], '"');
        super::write_record(&mut buf, ["a,b", "say \"hi\""], '"');
        assert_eq!("task,01\n\"a,b\",\"say \"\"hi\"\"\"\n", buf);
        let records = super::parse_records(&buf, '"')?;
        assert_eq!(vec!["a,b", "say \"hi\""], records[1]);
        Ok(())
    }
    #[test]
    fn test_unterminated() {
        assert!(super::parse_records("a,'b\n", '\'').is_err());
    }
}
