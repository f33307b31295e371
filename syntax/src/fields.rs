//! Inline `key=value` fields, mixed in with positional words,
//! e.g. `spc conf_samp runlvl=lvl_wbs cnf_range=n50`.
//! The same grammar reads `run_prefix = /path` assignments in the input block.

use crate::parse::prelude::*;
use crate::parse::util::lex_inline;

p! {
    key_or_val() -> &'a str, {
        recognize(skip_many1(satisfy(|c: char| !c.is_whitespace() && c != '=')))
    }
}

p! {
    field() -> (&'a str, &'a str), {
        key_or_val().skip(lex_inline(char('='))).and(key_or_val())
    }
}

p! {
    bare_word() -> &'a str, {
        recognize(skip_many1(satisfy(|c: char| !c.is_whitespace())))
    }
}

p! {
    token() -> Option<(&'a str, &'a str)>, {
        choice!(
            attempt(field()).map(Some),
            bare_word().map(|_| None)
        )
    }
}

p! {
    fields() -> Vec<(&'a str, &'a str)>, {
        spaces()
            .with(many(token().skip(spaces())))
            .skip(eof())
            .map(|tokens: Vec<_>| tokens.into_iter().flatten().collect())
    }
}
