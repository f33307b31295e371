//! Compact index notation, e.g. `1,3, 5-9\n11` or `1: 2-4` in a pes block.

use combine::error::StreamError;
use combine::stream::StreamErrorFor;

use crate::parse::prelude::*;
use crate::parse::util::{integer, lex, lex_inline};

/// Largest number of indices a single `start-stop` range may expand to.
const MAX_RANGE_LEN: usize = 10_000;

p! {
    index_entry() -> Vec<usize>, {
        integer()
            .and(optional(attempt(lex_inline(char('-')).with(integer()))))
            .and_then(|(start, stop): (usize, Option<usize>)| -> Result<Vec<usize>, StreamErrorFor<I>> {
                let Some(stop) = stop else {
                    return Ok(vec![start]);
                };
                if stop < start {
                    Err(StreamErrorFor::<I>::message_static_message("index range runs backwards"))
                } else if stop - start >= MAX_RANGE_LEN {
                    Err(StreamErrorFor::<I>::message_static_message("index range is too long"))
                } else {
                    Ok((start..=stop).collect())
                }
            })
    }
}

p! {
    index_delim() -> (), {
        attempt(lex_inline(one_of(",\n".chars()))).skip(spaces()).map(|_| ())
    }
}

p! {
    index_series() -> Vec<usize>, {
        spaces()
            .with(sep_end_by1(index_entry(), index_delim()))
            .skip(spaces())
            .skip(eof())
            .map(|entries: Vec<Vec<usize>>| entries.into_iter().flatten().collect())
    }
}

p! {
    pes_entry() -> (usize, &'a str), {
        integer()
            .skip(lex_inline(char(':')))
            .and(recognize(skip_many1(none_of("\n".chars()))))
    }
}

p! {
    pes_entries() -> Vec<(usize, &'a str)>, {
        many1(lex(pes_entry())).skip(eof())
    }
}
